/// What an inbound message asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Rewrite the article behind this URL.
    Url(String),
    /// Rewrite this raw text.
    Style(String),
    /// Make up a post from nothing.
    Filler,
    Ping,
    /// Anything else; answered with usage help.
    Help,
}

pub const STYLE_COMMAND: &str = "!style";
pub const FILLER_COMMAND: &str = "!filler";
pub const PING_COMMAND: &str = "!ping";

const URL_SCHEMES: [&str; 2] = ["http://", "https://"];

impl Command {
    pub fn parse(text: &str) -> Self {
        let text = text.trim();

        if let Some(first) = text.split_whitespace().next() {
            let lowered = first.to_ascii_lowercase();
            if URL_SCHEMES.iter().any(|scheme| lowered.starts_with(scheme)) {
                return Self::Url(first.to_string());
            }
        }

        if let Some(rest) = text.strip_prefix(STYLE_COMMAND)
            && (rest.is_empty() || rest.starts_with(char::is_whitespace))
        {
            let payload = rest.trim();
            return if payload.is_empty() {
                Self::Help
            } else {
                Self::Style(payload.to_string())
            };
        }

        match text {
            FILLER_COMMAND => Self::Filler,
            PING_COMMAND => Self::Ping,
            _ => Self::Help,
        }
    }
}

use thiserror::Error;

/// Failure of the external text-transformation service.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error("text service timed out")]
    Timeout,

    #[error("transport error: {0}")]
    Transport(String),

    #[error("text service returned http {status}: {body}")]
    Http { status: u16, body: String },

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("empty completion")]
    Empty,

    #[error("client setup failed: {0}")]
    Client(String),
}

impl ServiceError {
    pub fn from_reqwest_error(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_decode() {
            Self::Malformed(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

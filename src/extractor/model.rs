use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Title used when a page advertises none.
pub const NO_TITLE: &str = "Без заголовка";
/// Title used when the page could not be fetched at all.
pub const UNAVAILABLE_TITLE: &str = "Ошибка парсинга";

static SPACE_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[ \t\r\u{a0}]+").unwrap());
static NEWLINE_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n\s*\n+").unwrap());
static LINE_EDGE_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r" ?\n ?").unwrap());

/// What the pipeline knows about one article.
///
/// Built once per fetched page and never modified; the getters are the only
/// way to look inside.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleSummary {
    title: String,
    image_url: Option<String>,
    body_text: String,
}

impl ArticleSummary {
    pub fn new(title: impl Into<String>, image_url: Option<String>, body_text: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            image_url,
            body_text: body_text.into(),
        }
    }

    /// Summary for markup we could not parse: sentinel title, no image,
    /// empty body.
    pub fn degraded() -> Self {
        Self::new(NO_TITLE, None, String::new())
    }

    /// Summary for a page that never arrived. The title says so; there is
    /// nothing else to show.
    pub fn unavailable() -> Self {
        Self::new(UNAVAILABLE_TITLE, None, String::new())
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn image_url(&self) -> Option<&str> {
        self.image_url.as_deref()
    }

    pub fn body_text(&self) -> &str {
        &self.body_text
    }

    pub fn has_title(&self) -> bool {
        self.title != NO_TITLE
    }
}

/// Collapse runs of spaces and blank lines; keeps paragraph breaks.
pub fn normalize_whitespace(text: &str) -> String {
    let text = text.trim();
    let spaced = SPACE_REGEX.replace_all(text, " ");
    let paragraphs = NEWLINE_REGEX.replace_all(&spaced, "\n\n");
    LINE_EDGE_REGEX.replace_all(&paragraphs, "\n").into_owned()
}

/// Collapse all whitespace, newlines included, into single spaces.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_whitespace() {
        let text = "  Hello    world  \n\n\n  Test  ";
        assert_eq!(normalize_whitespace(text), "Hello world\n\nTest");
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace(" a \n b\t\tc "), "a b c");
    }

    #[test]
    fn degraded_uses_sentinel_title() {
        let summary = ArticleSummary::degraded();
        assert_eq!(summary.title(), NO_TITLE);
        assert!(!summary.has_title());
        assert_eq!(summary.image_url(), None);
        assert!(summary.body_text().is_empty());
    }

    #[test]
    fn unavailable_keeps_its_title() {
        let summary = ArticleSummary::unavailable();
        assert_eq!(summary.title(), UNAVAILABLE_TITLE);
        assert!(summary.has_title());
        assert!(summary.body_text().is_empty());
    }
}

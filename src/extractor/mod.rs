pub mod language;
pub mod model;
pub mod reader;

#[cfg(test)]
mod tests;

pub use language::{detect_language, is_foreign};
pub use model::{ArticleSummary, NO_TITLE, UNAVAILABLE_TITLE};
pub use reader::ParseError;

use tracing::warn;
use url::Url;

use crate::fetcher::types::PageResponse;

/// Parse markup into an [`ArticleSummary`]. Never fails: a parse error
/// yields [`ArticleSummary::degraded`].
pub fn extract(html: &str, base_url: Option<&Url>) -> ArticleSummary {
    match reader::try_extract(html, base_url) {
        Ok(summary) => summary,
        Err(e) => {
            warn!("Extraction failed, using degraded summary: {}", e);
            ArticleSummary::degraded()
        }
    }
}

/// [`extract`] a fetched page, resolving relative links against its final URL.
pub fn extract_page(resp: &PageResponse) -> ArticleSummary {
    extract(&resp.body_utf8, Some(&resp.url_final))
}

//! Rewrites text into the channel's voice and guarantees the result is
//! postable: bounded word count, canonical hashtag present.

pub mod persona;

use regex::Regex;
use std::sync::{Arc, LazyLock};
use std::time::Duration;
use tracing::{info, instrument, warn};

use crate::llm::{CompletionRequest, ServiceError, TextService};
use crate::text::{char_count, truncate_chars, truncate_words, word_count};

pub use persona::CLOSING_LINE;

/// Word ceiling for rewritten articles and raw text.
pub const ARTICLE_WORD_CEILING: usize = 140;
/// Word ceiling for generated filler posts.
pub const FILLER_WORD_CEILING: usize = 100;
/// Service input cap, in chars.
pub const MAX_INPUT_CHARS: usize = 800;
/// How much of the input the canned fallback quotes, in chars.
pub const FALLBACK_SNIPPET_CHARS: usize = 100;

const MAX_OUTPUT_UNITS: u32 = 400;
const TEMPERATURE: f32 = 0.9;

static BLANK_LINES_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").unwrap());

/// A post ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledPost {
    text: String,
    has_canonical_tag: bool,
}

impl StyledPost {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn has_canonical_tag(&self) -> bool {
        self.has_canonical_tag
    }
}

#[derive(Clone)]
pub struct StyleRewriter {
    service: Arc<dyn TextService>,
    timeout: Duration,
    hashtag: String,
}

impl StyleRewriter {
    pub fn new(service: Arc<dyn TextService>, timeout: Duration, hashtag: impl Into<String>) -> Self {
        Self {
            service,
            timeout,
            hashtag: hashtag.into(),
        }
    }

    pub fn hashtag(&self) -> &str {
        &self.hashtag
    }

    /// Rewrite through the service; errors are returned, not absorbed.
    #[instrument(skip_all, fields(chars = char_count(text), ceiling = ceiling))]
    pub async fn try_rewrite(
        &self,
        text: &str,
        title: Option<&str>,
        ceiling: usize,
    ) -> Result<StyledPost, ServiceError> {
        let input = truncate_chars(text.trim(), MAX_INPUT_CHARS);
        let request = CompletionRequest::new(
            persona::rewrite_prompt(input, title, ceiling, &self.hashtag),
            MAX_OUTPUT_UNITS,
            TEMPERATURE,
            self.timeout,
        );

        let raw = self.service.complete(request).await?;
        let post = finalize(&raw, ceiling, &self.hashtag);
        info!(
            "Rewrote {} chars into {} words",
            char_count(input),
            word_count(post.text())
        );
        Ok(post)
    }

    /// Rewrite, falling back to [`StyleRewriter::fallback_post`] on failure.
    pub async fn rewrite(&self, text: &str, title: Option<&str>, ceiling: usize) -> StyledPost {
        match self.try_rewrite(text, title, ceiling).await {
            Ok(post) => post,
            Err(e) => {
                warn!("Rewrite failed, using template post: {}", e);
                self.fallback_post(text, title, ceiling)
            }
        }
    }

    /// Deterministic post built without the service: title, the first
    /// [`FALLBACK_SNIPPET_CHARS`] chars of the input, the closing line and
    /// the hashtag.
    pub fn fallback_post(&self, text: &str, title: Option<&str>, ceiling: usize) -> StyledPost {
        let source = text.trim();
        let snippet = truncate_chars(source, FALLBACK_SNIPPET_CHARS);

        let mut parts = Vec::with_capacity(4);
        if let Some(title) = title.map(str::trim).filter(|title| !title.is_empty()) {
            parts.push(title.to_string());
        }
        if !snippet.is_empty() {
            if snippet.len() < source.len() {
                parts.push(format!("{snippet}…"));
            } else {
                parts.push(snippet.to_string());
            }
        }
        parts.push(CLOSING_LINE.to_string());
        parts.push(self.hashtag.clone());

        finalize(&parts.join("\n\n"), ceiling, &self.hashtag)
    }
}

/// Enforce the post-conditions on whatever the service produced:
/// exactly one `hashtag`, and at most `ceiling` words (clamped to at least 1).
///
/// Text that already satisfies both is returned trimmed but otherwise as
/// written. Anything else loses every tag occurrence, is cut to
/// `ceiling - 1` words and gets the tag appended on its own paragraph.
pub fn finalize(raw: &str, ceiling: usize, hashtag: &str) -> StyledPost {
    let ceiling = ceiling.max(1);
    let text = raw.trim();

    if tag_count(text, hashtag) == 1 && word_count(text) <= ceiling {
        return StyledPost {
            text: text.to_string(),
            has_canonical_tag: true,
        };
    }

    let stripped = strip_tags(text, hashtag);
    let text = append_tag(truncate_words(&stripped, ceiling - 1), hashtag);
    StyledPost {
        has_canonical_tag: has_tag(&text, hashtag),
        text,
    }
}

/// `hashtag` appears as its own word, trailing punctuation allowed.
pub fn has_tag(text: &str, hashtag: &str) -> bool {
    tag_count(text, hashtag) > 0
}

fn tag_count(text: &str, hashtag: &str) -> usize {
    text.split_whitespace()
        .filter(|word| is_tag_word(word, hashtag))
        .count()
}

fn is_tag_word(word: &str, hashtag: &str) -> bool {
    word.trim_end_matches(|c: char| c.is_ascii_punctuation() && c != '#') == hashtag
}

/// Drop every tag word; lines keep their order, blank-line runs collapse to
/// one paragraph break.
fn strip_tags(text: &str, hashtag: &str) -> String {
    let lines: Vec<String> = text
        .lines()
        .map(|line| {
            line.split_whitespace()
                .filter(|word| !is_tag_word(word, hashtag))
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect();
    BLANK_LINES_REGEX
        .replace_all(lines.join("\n").trim(), "\n\n")
        .into_owned()
}

fn append_tag(text: &str, hashtag: &str) -> String {
    let text = text.trim_end();
    if text.is_empty() {
        hashtag.to_string()
    } else {
        format!("{text}\n\n{hashtag}")
    }
}


#[cfg(all(test, feature = "fuzz"))]
mod fuzz {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn finalize_respects_ceiling_and_tag(
            parts in proptest::collection::vec(
                prop_oneof![
                    "[a-zа-я.,!]{1,8}",
                    Just("#глянец".to_string()),
                    Just("#глянец.".to_string()),
                    Just("\n".to_string()),
                ],
                0..80,
            ),
            ceiling in 0usize..60,
        ) {
            let raw = parts.join(" ");
            let post = finalize(&raw, ceiling, "#глянец");
            prop_assert!(word_count(post.text()) <= ceiling.max(1));
            prop_assert!(post.has_canonical_tag());
            prop_assert_eq!(post.text().matches("#глянец").count(), 1);
            prop_assert_eq!(finalize(post.text(), ceiling, "#глянец"), post);
        }
    }
}

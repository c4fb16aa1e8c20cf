//! Optional translation stage. Advisory only: it always returns text.

pub mod glossary;

use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument, warn};

use crate::llm::{CompletionRequest, TextService};
use crate::text::{char_count, truncate_chars};

/// Service input cap, in chars.
pub const MAX_INPUT_CHARS: usize = 1500;
/// Cap on what we hand back, in chars.
pub const MAX_OUTPUT_CHARS: usize = 1950;

const MAX_OUTPUT_UNITS: u32 = 1000;
const TEMPERATURE: f32 = 0.3;

#[derive(Clone)]
pub struct Translator {
    service: Arc<dyn TextService>,
    timeout: Duration,
}

impl Translator {
    pub fn new(service: Arc<dyn TextService>, timeout: Duration) -> Self {
        Self { service, timeout }
    }

    /// Translate `text` from `source` to `target` (ISO 639-1 tags).
    ///
    /// Falls back to [`glossary::substitute`] when the service fails.
    #[instrument(skip_all, fields(source = %source, target = %target, chars = char_count(text)))]
    pub async fn translate(&self, text: &str, source: &str, target: &str) -> String {
        let input = truncate_chars(text, MAX_INPUT_CHARS);
        if input.trim().is_empty() {
            return input.to_string();
        }

        let request = CompletionRequest::new(
            build_prompt(input, source, target),
            MAX_OUTPUT_UNITS,
            TEMPERATURE,
            self.timeout,
        );

        let translated = match self.service.complete(request).await {
            Ok(translated) => {
                info!("Translated {} chars", char_count(input));
                translated
            }
            Err(e) => {
                warn!("Translation failed, using glossary substitution: {}", e);
                glossary::substitute(input)
            }
        };

        truncate_chars(&translated, MAX_OUTPUT_CHARS).to_string()
    }
}

fn language_name(tag: &str) -> &str {
    match tag {
        "ru" => "Russian",
        "en" => "English",
        "de" => "German",
        "fr" => "French",
        "es" => "Spanish",
        "it" => "Italian",
        "uk" => "Ukrainian",
        other => other,
    }
}

fn build_prompt(text: &str, source: &str, target: &str) -> String {
    format!(
        "Translate the following text from {} to {}. \
         Keep names, numbers and quotes intact. \
         Reply with the translation only, no comments.\n\n{}",
        language_name(source),
        language_name(target),
        text
    )
}

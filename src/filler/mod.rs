//! Posts made from nothing but a topic.

use rand::seq::SliceRandom;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, instrument};

use crate::llm::{CompletionRequest, ServiceError, TextService};
use crate::rewriter::{FILLER_WORD_CEILING, StyleRewriter, StyledPost, persona};

pub const TOPICS: [&str; 8] = [
    "мода",
    "технологии",
    "путешествия",
    "дизайн интерьера",
    "гастрономия",
    "архитектура",
    "кино",
    "музыка",
];

const MAX_OUTPUT_UNITS: u32 = 600;
const TEMPERATURE: f32 = 1.0;

/// There is no source text to fall back on, so either stage failing fails
/// the whole generation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FillerError {
    #[error("topic generation failed: {0}")]
    Generation(ServiceError),

    #[error("styling failed: {0}")]
    Styling(ServiceError),
}

#[derive(Clone)]
pub struct FillerGenerator {
    service: Arc<dyn TextService>,
    rewriter: StyleRewriter,
    timeout: Duration,
}

impl FillerGenerator {
    pub fn new(service: Arc<dyn TextService>, rewriter: StyleRewriter, timeout: Duration) -> Self {
        Self {
            service,
            rewriter,
            timeout,
        }
    }

    /// Generate a post on a randomly chosen topic.
    pub async fn generate(&self) -> Result<StyledPost, FillerError> {
        let topic = pick_topic();
        self.generate_on(topic).await
    }

    #[instrument(skip(self))]
    pub async fn generate_on(&self, topic: &str) -> Result<StyledPost, FillerError> {
        let request = CompletionRequest::new(
            persona::filler_prompt(topic),
            MAX_OUTPUT_UNITS,
            TEMPERATURE,
            self.timeout,
        );
        let raw = self
            .service
            .complete(request)
            .await
            .map_err(FillerError::Generation)?;

        let post = self
            .rewriter
            .try_rewrite(&raw, None, FILLER_WORD_CEILING)
            .await
            .map_err(FillerError::Styling)?;

        info!("Generated filler post on '{}'", topic);
        Ok(post)
    }
}

// Not inlined into `generate`: ThreadRng must not live across an await.
fn pick_topic() -> &'static str {
    TOPICS
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(TOPICS[0])
}

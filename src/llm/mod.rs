//! Boundary to the external text-transformation service.
//!
//! Callers treat the service as slow, size-limited and unreliable: every
//! request carries its own timeout and every caller owns a fallback.

pub mod client;
pub mod errors;
pub mod types;

pub use client::OpenAiClient;
pub use errors::ServiceError;
pub use types::CompletionRequest;

use async_trait::async_trait;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TextService: Send + Sync {
    /// Run one completion. Must give up once `request.timeout` has elapsed.
    async fn complete(&self, request: CompletionRequest) -> Result<String, ServiceError>;
}

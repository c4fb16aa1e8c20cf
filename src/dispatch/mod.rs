//! Boundary to the chat platform.
//!
//! The platform owns the session: it hands us [`InboundEvent`]s and accepts
//! outbound messages through a [`Dispatcher`]. Nothing here knows which
//! platform sits behind it.

pub mod console;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

pub use console::ConsoleDispatcher;

/// A text message seen in a channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundEvent {
    pub author_id: String,
    pub channel_id: String,
    pub text: String,
}

impl InboundEvent {
    pub fn new(
        author_id: impl Into<String>,
        channel_id: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            author_id: author_id.into(),
            channel_id: channel_id.into(),
            text: text.into(),
        }
    }
}

/// Points at a message we posted, so it can be edited or deleted later.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MessageHandle {
    pub channel_id: String,
    pub message_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub filename: String,
    pub bytes: Bytes,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    pub text: String,
    pub attachment: Option<Attachment>,
}

impl OutboundMessage {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            attachment: None,
        }
    }

    pub fn with_attachment(text: impl Into<String>, attachment: Attachment) -> Self {
        Self {
            text: text.into(),
            attachment: Some(attachment),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DispatchError {
    #[error("platform rejected the message: {0}")]
    Rejected(String),

    #[error("io error: {0}")]
    Io(String),
}

#[async_trait]
pub trait Dispatcher: Send + Sync {
    /// Author id the platform uses for our own messages.
    fn self_id(&self) -> &str;

    async fn send(
        &self,
        channel_id: &str,
        message: OutboundMessage,
    ) -> Result<MessageHandle, DispatchError>;

    async fn edit(&self, handle: &MessageHandle, text: &str) -> Result<(), DispatchError>;

    async fn delete(&self, handle: &MessageHandle) -> Result<(), DispatchError>;
}

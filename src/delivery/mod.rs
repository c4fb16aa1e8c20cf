//! Getting final text (and maybe an image) onto the platform in order.

pub mod planner;

pub use planner::{Chunk, DeliveryLimits, DeliveryPlan, plan};

use thiserror::Error;
use tracing::{debug, warn};

use crate::dispatch::{DispatchError, Dispatcher, MessageHandle, OutboundMessage};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DeliveryError {
    #[error("sending chunk {index} failed: {source}")]
    Send {
        index: usize,
        #[source]
        source: DispatchError,
    },
}

/// Outcome of a completed delivery.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    pub handles: Vec<MessageHandle>,
    /// The platform refused the attachment and the text went out without it.
    pub attachment_dropped: bool,
}

/// Send `plan` chunk by chunk, each send awaited before the next starts.
///
/// A chunk whose attachment the platform refuses is re-sent as text only.
/// Any other failure stops delivery; chunks already sent stay sent.
pub async fn deliver(
    dispatcher: &dyn Dispatcher,
    channel_id: &str,
    plan: DeliveryPlan,
) -> Result<DeliveryReport, DeliveryError> {
    let mut handles = Vec::with_capacity(plan.len());
    let mut attachment_dropped = false;

    for (index, chunk) in plan.into_chunks().into_iter().enumerate() {
        let Chunk { text, attachment } = chunk;

        let Some(attachment) = attachment else {
            if text.is_empty() {
                continue;
            }
            let handle = dispatcher
                .send(channel_id, OutboundMessage::text(text))
                .await
                .map_err(|source| DeliveryError::Send { index, source })?;
            handles.push(handle);
            continue;
        };

        let filename = attachment.filename.clone();
        match dispatcher
            .send(channel_id, OutboundMessage::with_attachment(text.clone(), attachment))
            .await
        {
            Ok(handle) => {
                debug!("Sent chunk {} with attachment {}", index, filename);
                handles.push(handle);
            }
            Err(e) => {
                warn!("Attachment {} rejected, sending text only: {}", filename, e);
                attachment_dropped = true;
                if text.is_empty() {
                    continue;
                }
                let handle = dispatcher
                    .send(channel_id, OutboundMessage::text(text))
                    .await
                    .map_err(|source| DeliveryError::Send { index, source })?;
                handles.push(handle);
            }
        }
    }

    Ok(DeliveryReport {
        handles,
        attachment_dropped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::Attachment;
    use async_trait::async_trait;
    use bytes::Bytes;
    use std::sync::Mutex;

    /// Records sends; refuses attachments or every send when told to.
    #[derive(Default)]
    struct Recorder {
        sent: Mutex<Vec<OutboundMessage>>,
        refuse_attachments: bool,
        fail_from: Option<usize>,
    }

    #[async_trait]
    impl Dispatcher for Recorder {
        fn self_id(&self) -> &str {
            "bot"
        }

        async fn send(
            &self,
            channel_id: &str,
            message: OutboundMessage,
        ) -> Result<MessageHandle, DispatchError> {
            let mut sent = self.sent.lock().unwrap();
            if self.refuse_attachments && message.attachment.is_some() {
                return Err(DispatchError::Rejected("file too large".to_string()));
            }
            if self.fail_from.is_some_and(|n| sent.len() >= n) {
                return Err(DispatchError::Io("connection reset".to_string()));
            }
            sent.push(message);
            Ok(MessageHandle {
                channel_id: channel_id.to_string(),
                message_id: sent.len().to_string(),
            })
        }

        async fn edit(&self, _handle: &MessageHandle, _text: &str) -> Result<(), DispatchError> {
            Ok(())
        }

        async fn delete(&self, _handle: &MessageHandle) -> Result<(), DispatchError> {
            Ok(())
        }
    }

    fn image() -> Attachment {
        Attachment {
            filename: "image.jpg".to_string(),
            bytes: Bytes::from_static(b"jpg"),
        }
    }

    #[tokio::test]
    async fn sends_chunks_in_order() {
        let recorder = Recorder::default();
        let text = "abcdefghij".repeat(3);
        let plan = plan(&text, Some(image()), DeliveryLimits::new(10), "#t");

        let report = deliver(&recorder, "c", plan).await.unwrap();

        let sent = recorder.sent.lock().unwrap();
        assert_eq!(report.handles.len(), 3);
        assert!(!report.attachment_dropped);
        assert_eq!(sent.iter().map(|m| m.text.as_str()).collect::<String>(), text);
        assert!(sent[0].attachment.is_none());
        assert_eq!(sent[2].attachment, Some(image()));
    }

    #[tokio::test]
    async fn refused_attachment_degrades_to_text() {
        let recorder = Recorder {
            refuse_attachments: true,
            ..Default::default()
        };
        let plan = plan("пост", Some(image()), DeliveryLimits::new(100), "#t");

        let report = deliver(&recorder, "c", plan).await.unwrap();

        let sent = recorder.sent.lock().unwrap();
        assert_eq!(report.handles.len(), 1);
        assert!(report.attachment_dropped);
        assert_eq!(sent[0], OutboundMessage::text("пост"));
    }

    #[tokio::test]
    async fn empty_chunks_are_skipped() {
        let recorder = Recorder::default();
        let plan = plan("", None, DeliveryLimits::new(100), "#t");

        let report = deliver(&recorder, "c", plan).await.unwrap();
        assert!(report.handles.is_empty());
    }

    #[tokio::test]
    async fn send_failure_stops_delivery() {
        let recorder = Recorder {
            fail_from: Some(1),
            ..Default::default()
        };
        let plan = plan(&"x".repeat(25), None, DeliveryLimits::new(10), "#t");

        let err = deliver(&recorder, "c", plan).await.unwrap_err();

        assert!(matches!(err, DeliveryError::Send { index: 1, .. }));
        assert_eq!(recorder.sent.lock().unwrap().len(), 1);
    }
}

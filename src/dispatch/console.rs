use async_trait::async_trait;
use std::io::Write;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::dispatch::{DispatchError, Dispatcher, MessageHandle, OutboundMessage};

/// Prints outbound traffic to stdout. Lets the bot run without a chat
/// platform.
#[derive(Debug)]
pub struct ConsoleDispatcher {
    self_id: String,
    next_id: AtomicU64,
}

impl ConsoleDispatcher {
    pub fn new(self_id: impl Into<String>) -> Self {
        Self {
            self_id: self_id.into(),
            next_id: AtomicU64::new(1),
        }
    }

    fn print(&self, line: String) -> Result<(), DispatchError> {
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{line}").map_err(|e| DispatchError::Io(e.to_string()))
    }
}

#[async_trait]
impl Dispatcher for ConsoleDispatcher {
    fn self_id(&self) -> &str {
        &self.self_id
    }

    async fn send(
        &self,
        channel_id: &str,
        message: OutboundMessage,
    ) -> Result<MessageHandle, DispatchError> {
        let message_id = self.next_id.fetch_add(1, Ordering::Relaxed).to_string();
        let mut line = format!("[{channel_id}#{message_id}] {}", message.text);
        if let Some(attachment) = &message.attachment {
            line.push_str(&format!(
                "\n[{channel_id}#{message_id}] 📎 {} ({} bytes)",
                attachment.filename,
                attachment.bytes.len()
            ));
        }
        self.print(line)?;

        Ok(MessageHandle {
            channel_id: channel_id.to_string(),
            message_id,
        })
    }

    async fn edit(&self, handle: &MessageHandle, text: &str) -> Result<(), DispatchError> {
        self.print(format!(
            "[{}#{}] (edited) {}",
            handle.channel_id, handle.message_id, text
        ))
    }

    async fn delete(&self, handle: &MessageHandle) -> Result<(), DispatchError> {
        self.print(format!(
            "[{}#{}] (deleted)",
            handle.channel_id, handle.message_id
        ))
    }
}

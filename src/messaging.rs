//! Messaging boundary
//!
//! The assistant never talks to the network itself; it is handed inbound
//! messages and replies through the [`Messenger`] capability. Delivery,
//! addressing, announcements and retries all belong to the hosting
//! framework behind the trait. The crate ships a console implementation
//! that the binary uses for local interaction.

use crate::Result;
use async_trait::async_trait;
use std::path::PathBuf;
use tracing::info;

/// One inbound message from the network
#[derive(Debug, Clone, PartialEq)]
pub struct InboundMessage {
    /// Opaque sender address, echoed back as the reply destination
    pub sender: String,
    /// Decoded message text
    pub content: String,
}

/// An image attachment accompanying a reply
#[derive(Debug, Clone, PartialEq)]
pub struct Attachment {
    /// File name presented to the recipient
    pub name: String,
    /// Short format tag, e.g. "jpg"
    pub format: String,
    /// Raw image bytes
    pub data: Vec<u8>,
}

/// Capability interface to the external messaging collaborator
#[async_trait]
pub trait Messenger: Send + Sync {
    /// Send a plain text reply
    async fn send_text(&self, destination: &str, text: &str) -> Result<()>;

    /// Send a text reply with an image attachment
    async fn send_text_with_attachment(
        &self,
        destination: &str,
        text: &str,
        attachment: &Attachment,
    ) -> Result<()>;
}

/// Console messenger: replies go to stdout, attachments are written under
/// the storage directory.
pub struct ConsoleMessenger {
    storage_path: PathBuf,
}

impl ConsoleMessenger {
    #[must_use]
    pub fn new(storage_path: impl Into<PathBuf>) -> Self {
        Self {
            storage_path: storage_path.into(),
        }
    }
}

#[async_trait]
impl Messenger for ConsoleMessenger {
    async fn send_text(&self, destination: &str, text: &str) -> Result<()> {
        println!("-> {destination}\n{text}\n");
        Ok(())
    }

    async fn send_text_with_attachment(
        &self,
        destination: &str,
        text: &str,
        attachment: &Attachment,
    ) -> Result<()> {
        tokio::fs::create_dir_all(&self.storage_path).await?;
        let path = self.storage_path.join(&attachment.name);
        tokio::fs::write(&path, &attachment.data).await?;
        info!("Saved attachment to {}", path.display());

        println!(
            "-> {destination}\n{text}\n[attachment: {} ({} bytes) saved to {}]\n",
            attachment.name,
            attachment.data.len(),
            path.display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn console_messenger_writes_attachment_to_storage() {
        let dir = tempfile::tempdir().unwrap();
        let messenger = ConsoleMessenger::new(dir.path());
        let attachment = Attachment {
            name: "test.jpg".to_string(),
            format: "jpg".to_string(),
            data: vec![0xFF, 0xD8, 0xFF],
        };

        messenger
            .send_text_with_attachment("peer", "hello", &attachment)
            .await
            .unwrap();

        let written = std::fs::read(dir.path().join("test.jpg")).unwrap();
        assert_eq!(written, attachment.data);
    }

    #[tokio::test]
    async fn console_messenger_send_text_succeeds() {
        let messenger = ConsoleMessenger::new("data/unused");
        assert!(messenger.send_text("peer", "hello").await.is_ok());
    }
}

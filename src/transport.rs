//! Outbound side of the chat transport.
//!
//! The conversation code only ever needs to send text and re-send a photo
//! it already knows by file id, so that is all this trait exposes.

use anyhow::Result;
use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{FileId, InputFile, Recipient};

#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn send_text(&self, chat_id: ChatId, text: &str) -> Result<()>;

    /// Send a photo by its Telegram file id, without re-uploading it
    async fn send_photo_reference(
        &self,
        destination: Recipient,
        reference: &str,
        caption: &str,
    ) -> Result<()>;
}

#[async_trait]
impl ChatTransport for Bot {
    async fn send_text(&self, chat_id: ChatId, text: &str) -> Result<()> {
        self.send_message(chat_id, text).await?;
        Ok(())
    }

    async fn send_photo_reference(
        &self,
        destination: Recipient,
        reference: &str,
        caption: &str,
    ) -> Result<()> {
        self.send_photo(destination, InputFile::file_id(FileId(reference.to_string())))
            .caption(caption)
            .await?;
        Ok(())
    }
}

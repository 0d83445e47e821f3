//! Inbound event resolution
//!
//! Telegram messages carry a loose bag of optional fields. They are turned
//! into an [`InboundEvent`] once, at the edge, so the conversation code only
//! ever matches on a closed set of cases.

use teloxide::prelude::*;

/// Prefix that marks a message as a bot command
pub const COMMAND_PREFIX: char = '/';

/// One size variant of an incoming photo
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoVariant {
    /// Telegram file id, usable to re-send the image
    pub reference: String,
    pub width: u32,
    pub height: u32,
}

impl PhotoVariant {
    pub fn pixels(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundEvent {
    /// `/name args`; `name` is lower-cased and stripped of `@botname`
    Command { name: String, args: String },
    TextMessage { text: String },
    PhotoMessage { variants: Vec<PhotoVariant> },
    /// Anything carrying neither text nor a photo (stickers, documents, ...)
    Other,
}

impl InboundEvent {
    pub fn from_message(msg: &Message) -> Self {
        if let Some(text) = msg.text() {
            return Self::from_text(text);
        }

        if let Some(photos) = msg.photo() {
            let variants = photos
                .iter()
                .map(|photo| PhotoVariant {
                    reference: photo.file.id.0.clone(),
                    width: photo.width,
                    height: photo.height,
                })
                .collect();
            return Self::PhotoMessage { variants };
        }

        Self::Other
    }

    /// Classify a text message as a command or plain text
    pub fn from_text(text: &str) -> Self {
        match parse_command(text) {
            Some((name, args)) => Self::Command { name, args },
            None => Self::TextMessage {
                text: text.to_string(),
            },
        }
    }
}

/// Split `/name@bot some args` into `("name", "some args")`
pub fn parse_command(text: &str) -> Option<(String, String)> {
    let rest = text.strip_prefix(COMMAND_PREFIX)?;
    let (head, args) = match rest.split_once(char::is_whitespace) {
        Some((head, args)) => (head, args.trim()),
        None => (rest, ""),
    };
    let name = head.split('@').next().unwrap_or_default();

    Some((name.to_lowercase(), args.to_string()))
}

/// The highest-resolution variant; ties go to the later entry
pub fn largest_variant(variants: &[PhotoVariant]) -> Option<&PhotoVariant> {
    variants.iter().max_by_key(|variant| variant.pixels())
}

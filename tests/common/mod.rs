//! Shared fakes for the integration tests
#![allow(dead_code)]

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use teloxide::types::{ChatId, Recipient};

use matchbooking::bot::{BotContext, ChatSession};
use matchbooking::dialogue::{in_memory_sessions, RegistrationDialogue, SessionStorage};
use matchbooking::registrant::{
    InMemoryRegistrantStore, Registrant, RegistrantFilter, RegistrantStore, RegistrantUpdate,
};
use matchbooking::relay::GroupRelay;
use matchbooking::transport::ChatTransport;

pub const GROUP_CHAT: ChatId = ChatId(-1001234567890);

#[derive(Debug, Clone, PartialEq)]
pub struct SentPhoto {
    pub destination: Recipient,
    pub reference: String,
    pub caption: String,
}

/// Transport that records everything the bot sends
#[derive(Debug, Default)]
pub struct RecordingTransport {
    texts: Mutex<Vec<(ChatId, String)>>,
    photos: Mutex<Vec<SentPhoto>>,
    failing_references: HashSet<String>,
    fail_texts: bool,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Photo sends of these file ids fail like an invalid file id would
    pub fn failing_photos_for(references: &[&str]) -> Self {
        Self {
            failing_references: references.iter().map(|r| r.to_string()).collect(),
            ..Default::default()
        }
    }

    /// Every text send fails like a network error would
    pub fn failing_texts() -> Self {
        Self {
            fail_texts: true,
            ..Default::default()
        }
    }

    pub fn texts_to(&self, chat_id: ChatId) -> Vec<String> {
        self.texts
            .lock()
            .unwrap()
            .iter()
            .filter(|(chat, _)| *chat == chat_id)
            .map(|(_, text)| text.clone())
            .collect()
    }

    pub fn last_text_to(&self, chat_id: ChatId) -> Option<String> {
        self.texts_to(chat_id).pop()
    }

    pub fn photos(&self) -> Vec<SentPhoto> {
        self.photos.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.texts.lock().unwrap().clear();
        self.photos.lock().unwrap().clear();
    }
}

#[async_trait]
impl ChatTransport for RecordingTransport {
    async fn send_text(&self, chat_id: ChatId, text: &str) -> Result<()> {
        if self.fail_texts {
            return Err(anyhow!("network unreachable"));
        }
        self.texts.lock().unwrap().push((chat_id, text.to_string()));
        Ok(())
    }

    async fn send_photo_reference(
        &self,
        destination: Recipient,
        reference: &str,
        caption: &str,
    ) -> Result<()> {
        if self.failing_references.contains(reference) {
            return Err(anyhow!("Bad Request: wrong file identifier"));
        }
        self.photos.lock().unwrap().push(SentPhoto {
            destination,
            reference: reference.to_string(),
            caption: caption.to_string(),
        });
        Ok(())
    }
}

/// Store whose every operation fails
#[derive(Debug, Default)]
pub struct FailingStore;

#[async_trait]
impl RegistrantStore for FailingStore {
    async fn find_by_session_id(&self, _session_id: i64) -> Result<Option<Registrant>> {
        Err(anyhow!("database unavailable"))
    }

    async fn upsert_by_session_id(
        &self,
        _session_id: i64,
        _update: &RegistrantUpdate,
    ) -> Result<Registrant> {
        Err(anyhow!("database unavailable"))
    }

    async fn update_by_id(
        &self,
        _id: i64,
        _update: &RegistrantUpdate,
    ) -> Result<Option<Registrant>> {
        Err(anyhow!("database unavailable"))
    }

    async fn find_many(&self, _filter: &RegistrantFilter) -> Result<Vec<Registrant>> {
        Err(anyhow!("database unavailable"))
    }
}

pub fn group_relay() -> GroupRelay {
    GroupRelay::new(Some(Recipient::Id(GROUP_CHAT)), Duration::ZERO)
}

pub fn context(store: Arc<dyn RegistrantStore>, relay: GroupRelay) -> BotContext {
    BotContext::new(store, relay, Vec::new())
}

/// Private chat with a user: chat id and session id are the same
pub fn private_session(user_id: i64) -> ChatSession {
    ChatSession {
        chat_id: ChatId(user_id),
        session_id: user_id,
        language_code: None,
    }
}

pub fn dialogue_for(sessions: &Arc<SessionStorage>, chat_id: ChatId) -> RegistrationDialogue {
    RegistrationDialogue::new(sessions.clone(), chat_id)
}

pub fn new_sessions() -> Arc<SessionStorage> {
    in_memory_sessions()
}

pub fn store() -> Arc<InMemoryRegistrantStore> {
    Arc::new(InMemoryRegistrantStore::new())
}

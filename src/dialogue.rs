//! Registration dialogue module for tracking where each chat is in the flow.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use teloxide::dispatching::dialogue::{Dialogue, ErasedStorage, InMemStorage, Storage};

use crate::errors::SessionError;

/// Represents the conversation state of a chat
///
/// State is keyed by chat, not by the registrant. With the in-memory
/// backend it is lost whenever the process restarts.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegistrationState {
    /// No registration in progress
    #[default]
    Idle,
    AwaitingName,
    AwaitingPhoto,
}

/// Session table behind a type-erased teloxide storage
pub type SessionStorage = ErasedStorage<RegistrationState>;

/// Type alias for our registration dialogue
pub type RegistrationDialogue = Dialogue<RegistrationState, SessionStorage>;

/// Volatile session table backed by a process-local map
pub fn in_memory_sessions() -> Arc<SessionStorage> {
    InMemStorage::<RegistrationState>::new().erase()
}

/// Current state of the chat, `Idle` when nothing is stored
pub async fn current_state(dialogue: &RegistrationDialogue) -> Result<RegistrationState> {
    let state = dialogue.get().await.map_err(SessionError)?;
    Ok(state.unwrap_or_default())
}

/// Replace the state of the chat
pub async fn set_state(dialogue: &RegistrationDialogue, state: RegistrationState) -> Result<()> {
    dialogue.update(state).await.map_err(SessionError)?;
    Ok(())
}

/// Validates a submitted display name
pub fn validate_display_name(name: &str) -> Result<String, &'static str> {
    let trimmed = name.trim();

    if trimmed.is_empty() {
        return Err("empty");
    }

    Ok(trimmed.to_string())
}

//! # Registrant Model
//!
//! One record per registered Telegram user, plus the persistence seam the
//! conversation code talks to.
//!
//! ## Invariants
//!
//! - `session_id` is unique; records are created by an upsert on the first
//!   name submission and mutated in place afterwards, never deleted.
//! - `relayed` only ever moves from `false` to `true`. [`RegistrantUpdate`]
//!   can raise the flag but has no way to clear it.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

/// MIME type recorded for Telegram photos
pub const DEFAULT_PHOTO_MIME_TYPE: &str = "image/jpeg";

/// A stored registration
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Registrant {
    /// Store-assigned identity
    pub id: i64,
    /// Telegram user id of the registrant
    pub session_id: i64,
    pub display_name: Option<String>,
    /// Telegram file id of the largest photo variant
    pub photo_reference: Option<String>,
    pub photo_mime_type: String,
    /// Whether the photo has been forwarded to the group chat
    pub relayed: bool,
    pub registered_at: DateTime<Utc>,
}

impl Registrant {
    pub fn has_photo(&self) -> bool {
        self.photo_reference.is_some()
    }
}

/// Fields to set on a registrant; `None` leaves the stored value untouched
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegistrantUpdate {
    pub display_name: Option<String>,
    pub photo_reference: Option<String>,
    pub photo_mime_type: Option<String>,
    /// Set `relayed = true`; `false` keeps the current value
    pub mark_relayed: bool,
}

impl RegistrantUpdate {
    pub fn name(display_name: impl Into<String>) -> Self {
        Self {
            display_name: Some(display_name.into()),
            ..Default::default()
        }
    }

    pub fn photo(reference: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            photo_reference: Some(reference.into()),
            photo_mime_type: Some(mime_type.into()),
            ..Default::default()
        }
    }

    pub fn relayed() -> Self {
        Self {
            mark_relayed: true,
            ..Default::default()
        }
    }

    fn apply(&self, registrant: &mut Registrant) {
        if let Some(name) = &self.display_name {
            registrant.display_name = Some(name.clone());
        }
        if let Some(reference) = &self.photo_reference {
            registrant.photo_reference = Some(reference.clone());
        }
        if let Some(mime_type) = &self.photo_mime_type {
            registrant.photo_mime_type = mime_type.clone();
        }
        registrant.relayed |= self.mark_relayed;
    }
}

/// Criteria for [`RegistrantStore::find_many`]; `None` matches anything
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegistrantFilter {
    pub has_photo: Option<bool>,
    pub relayed: Option<bool>,
}

impl RegistrantFilter {
    /// Registrants with a photo that has not reached the group yet
    pub fn pending_relay() -> Self {
        Self {
            has_photo: Some(true),
            relayed: Some(false),
        }
    }

    pub fn matches(&self, registrant: &Registrant) -> bool {
        self.has_photo.map_or(true, |wanted| registrant.has_photo() == wanted)
            && self.relayed.map_or(true, |wanted| registrant.relayed == wanted)
    }
}

/// Persistence operations the bot needs for registrants
#[async_trait]
pub trait RegistrantStore: Send + Sync {
    async fn find_by_session_id(&self, session_id: i64) -> Result<Option<Registrant>>;

    /// Create the record for `session_id` or update the existing one
    async fn upsert_by_session_id(
        &self,
        session_id: i64,
        update: &RegistrantUpdate,
    ) -> Result<Registrant>;

    /// Update an existing record; `None` when no record has that identity
    async fn update_by_id(&self, id: i64, update: &RegistrantUpdate) -> Result<Option<Registrant>>;

    /// Records matching `filter`, oldest first
    async fn find_many(&self, filter: &RegistrantFilter) -> Result<Vec<Registrant>>;
}

/// Registrant store kept in process memory
#[derive(Debug, Default)]
pub struct InMemoryRegistrantStore {
    registrants: Mutex<Vec<Registrant>>,
}

impl InMemoryRegistrantStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.registrants.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.registrants.lock().await.is_empty()
    }
}

#[async_trait]
impl RegistrantStore for InMemoryRegistrantStore {
    async fn find_by_session_id(&self, session_id: i64) -> Result<Option<Registrant>> {
        let registrants = self.registrants.lock().await;
        Ok(registrants
            .iter()
            .find(|r| r.session_id == session_id)
            .cloned())
    }

    async fn upsert_by_session_id(
        &self,
        session_id: i64,
        update: &RegistrantUpdate,
    ) -> Result<Registrant> {
        let mut registrants = self.registrants.lock().await;

        if let Some(existing) = registrants.iter_mut().find(|r| r.session_id == session_id) {
            update.apply(existing);
            return Ok(existing.clone());
        }

        let mut registrant = Registrant {
            id: registrants.len() as i64 + 1,
            session_id,
            display_name: None,
            photo_reference: None,
            photo_mime_type: DEFAULT_PHOTO_MIME_TYPE.to_string(),
            relayed: false,
            registered_at: Utc::now(),
        };
        update.apply(&mut registrant);
        registrants.push(registrant.clone());
        Ok(registrant)
    }

    async fn update_by_id(&self, id: i64, update: &RegistrantUpdate) -> Result<Option<Registrant>> {
        let mut registrants = self.registrants.lock().await;
        Ok(registrants.iter_mut().find(|r| r.id == id).map(|existing| {
            update.apply(existing);
            existing.clone()
        }))
    }

    async fn find_many(&self, filter: &RegistrantFilter) -> Result<Vec<Registrant>> {
        let registrants = self.registrants.lock().await;
        Ok(registrants
            .iter()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect())
    }
}

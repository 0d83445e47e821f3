//! # Group Relay Module
//!
//! Forwards stored registration photos to the shared group chat and
//! records which registrants have been relayed.
//!
//! A single relay attempt never fails loudly: every problem (no group
//! configured, no photo, Telegram or database errors) is logged and turned
//! into a `false` result. Batches run strictly one after another with a
//! short pause between calls.

use anyhow::Result;
use std::time::Duration;
use teloxide::types::Recipient;
use tracing::{debug, error, info};

use crate::config::DEFAULT_RELAY_DELAY_MS;
use crate::errors::RelayError;
use crate::localization::{t_args_lang, t_lang};
use crate::registrant::{Registrant, RegistrantFilter, RegistrantStore, RegistrantUpdate};
use crate::transport::ChatTransport;

/// Outcome counts of a batch relay
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShareSummary {
    pub succeeded: usize,
    pub failed: usize,
}

impl ShareSummary {
    pub fn total(&self) -> usize {
        self.succeeded + self.failed
    }
}

/// Relays registration photos to the configured group chat
#[derive(Debug, Clone)]
pub struct GroupRelay {
    destination: Option<Recipient>,
    delay: Duration,
}

impl Default for GroupRelay {
    fn default() -> Self {
        Self {
            destination: None,
            delay: Duration::from_millis(DEFAULT_RELAY_DELAY_MS),
        }
    }
}

impl GroupRelay {
    pub fn new(destination: Option<Recipient>, delay: Duration) -> Self {
        Self { destination, delay }
    }

    pub fn is_enabled(&self) -> bool {
        self.destination.is_some()
    }

    /// Send the registrant's photo to the group and mark it as relayed
    ///
    /// Returns `true` only when the photo was sent and the record updated.
    /// Relaying an already relayed registrant sends the photo again and
    /// leaves `relayed` set.
    pub async fn relay(
        &self,
        transport: &dyn ChatTransport,
        store: &dyn RegistrantStore,
        registrant: &Registrant,
    ) -> bool {
        match self.try_relay(transport, store, registrant).await {
            Ok(()) => {
                info!(
                    session_id = registrant.session_id,
                    "Photo relayed to group"
                );
                true
            }
            Err(e) if e.is_disabled() => {
                debug!(
                    session_id = registrant.session_id,
                    "Skipping relay, no target group configured"
                );
                false
            }
            Err(e) => {
                error!(
                    session_id = registrant.session_id,
                    error = %e,
                    "Failed to relay photo to group"
                );
                false
            }
        }
    }

    async fn try_relay(
        &self,
        transport: &dyn ChatTransport,
        store: &dyn RegistrantStore,
        registrant: &Registrant,
    ) -> Result<(), RelayError> {
        let destination = self.destination.clone().ok_or(RelayError::NoDestination)?;
        let reference = registrant
            .photo_reference
            .as_deref()
            .ok_or(RelayError::MissingPhoto(registrant.session_id))?;

        let name = registrant
            .display_name
            .clone()
            .unwrap_or_else(|| t_lang("unknown-name", None));
        let caption = t_args_lang("relay-caption", &[("name", &name)], None);

        transport
            .send_photo_reference(destination, reference, &caption)
            .await
            .map_err(RelayError::Transport)?;

        store
            .update_by_id(registrant.id, &RegistrantUpdate::relayed())
            .await
            .map_err(RelayError::Store)?
            .ok_or(RelayError::RecordMissing(registrant.id))?;

        Ok(())
    }

    /// Registrants that have a photo but have not been relayed yet
    pub async fn pending(&self, store: &dyn RegistrantStore) -> Result<Vec<Registrant>> {
        store.find_many(&RegistrantFilter::pending_relay()).await
    }

    /// Relay each candidate in order, pausing between calls
    pub async fn relay_batch(
        &self,
        transport: &dyn ChatTransport,
        store: &dyn RegistrantStore,
        candidates: &[Registrant],
    ) -> ShareSummary {
        let mut summary = ShareSummary::default();

        for (index, registrant) in candidates.iter().enumerate() {
            if index > 0 && !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }

            if self.relay(transport, store, registrant).await {
                summary.succeeded += 1;
            } else {
                summary.failed += 1;
            }
        }

        debug!(
            succeeded = summary.succeeded,
            failed = summary.failed,
            "Batch relay finished"
        );
        summary
    }
}

//! # Error Types Module
//!
//! Structured errors for the parts of the bot that need to tell failure
//! modes apart. Handler code otherwise works with `anyhow::Result`.

use thiserror::Error;

/// Errors raised while loading the process configuration
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A required environment variable is absent or blank
    #[error("{0} must be set")]
    MissingVariable(&'static str),
    /// The target group is neither a numeric chat id nor an `@channel` name
    #[error("TARGET_GROUP_ID is not a chat id or @channel name: {0}")]
    InvalidTargetGroup(String),
    /// An entry of `ADMIN_IDS` is not a numeric user id
    #[error("ADMIN_IDS contains an invalid user id: {0}")]
    InvalidAdminId(String),
    /// A numeric setting could not be parsed
    #[error("{name} is not a valid number: {value}")]
    InvalidNumber { name: &'static str, value: String },
}

/// Reasons a single relay attempt to the group chat failed
///
/// These never cross the relay boundary: [`crate::relay::GroupRelay::relay`]
/// logs them and reports a plain `false`.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("no target group configured")]
    NoDestination,
    #[error("registrant {0} has no photo reference")]
    MissingPhoto(i64),
    #[error("failed to send photo to group: {0:#}")]
    Transport(anyhow::Error),
    #[error("failed to mark registrant as relayed: {0:#}")]
    Store(anyhow::Error),
    #[error("registrant {0} disappeared before it could be marked as relayed")]
    RecordMissing(i64),
}

impl RelayError {
    /// Relaying is switched off rather than broken
    pub fn is_disabled(&self) -> bool {
        matches!(self, Self::NoDestination)
    }
}

/// Failure reported by the session state storage
#[derive(Debug, Error)]
#[error("session storage failure: {0}")]
pub struct SessionError(#[source] pub Box<dyn std::error::Error + Send + Sync>);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_messages() {
        assert_eq!(
            ConfigError::MissingVariable("TELEGRAM_BOT_TOKEN").to_string(),
            "TELEGRAM_BOT_TOKEN must be set"
        );
        assert_eq!(
            ConfigError::InvalidNumber {
                name: "RELAY_DELAY_MS",
                value: "soon".to_string()
            }
            .to_string(),
            "RELAY_DELAY_MS is not a valid number: soon"
        );
    }

    #[test]
    fn test_relay_error_includes_cause() {
        let err = RelayError::Transport(anyhow::anyhow!("chat not found"));
        assert!(err.to_string().contains("chat not found"));
    }

    #[test]
    fn test_only_missing_destination_counts_as_disabled() {
        assert!(RelayError::NoDestination.is_disabled());
        assert!(!RelayError::MissingPhoto(1).is_disabled());
        assert!(!RelayError::Transport(anyhow::anyhow!("chat not found")).is_disabled());
        assert!(!RelayError::Store(anyhow::anyhow!("database unavailable")).is_disabled());
        assert!(!RelayError::RecordMissing(1).is_disabled());
    }
}

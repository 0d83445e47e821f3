//! # Configuration Module
//!
//! Reads the bot's startup settings from the environment. Only the bot
//! token and the database URL are required; a missing target group simply
//! disables relaying photos to the group chat.

use std::env;
use std::time::Duration;

use teloxide::types::{ChatId, Recipient};

use crate::errors::ConfigError;

/// Delay between two relay calls of a batch, in milliseconds
pub const DEFAULT_RELAY_DELAY_MS: u64 = 100;

/// Settings the bot reads once at startup
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// Telegram bot API token
    pub bot_token: String,
    /// Postgres connection string
    pub database_url: String,
    /// Chat the registration photos are relayed to
    pub target_group: Option<Recipient>,
    /// Users allowed to run `/shareall`; empty means everyone
    pub admin_ids: Vec<i64>,
    /// Pause between sequential relay calls of `/shareall`
    pub relay_delay: Duration,
}

impl BotConfig {
    /// Load configuration from process environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    ///
    /// Blank values are treated the same as absent ones.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let bot_token =
            get("TELEGRAM_BOT_TOKEN").ok_or(ConfigError::MissingVariable("TELEGRAM_BOT_TOKEN"))?;
        let database_url =
            get("DATABASE_URL").ok_or(ConfigError::MissingVariable("DATABASE_URL"))?;

        let target_group = get("TARGET_GROUP_ID")
            .map(|raw| parse_target_group(&raw))
            .transpose()?;

        let admin_ids = match get("ADMIN_IDS") {
            Some(raw) => parse_admin_ids(&raw)?,
            None => Vec::new(),
        };

        let relay_delay_ms = match get("RELAY_DELAY_MS") {
            Some(raw) => raw.parse::<u64>().map_err(|_| ConfigError::InvalidNumber {
                name: "RELAY_DELAY_MS",
                value: raw,
            })?,
            None => DEFAULT_RELAY_DELAY_MS,
        };

        Ok(Self {
            bot_token,
            database_url,
            target_group,
            admin_ids,
            relay_delay: Duration::from_millis(relay_delay_ms),
        })
    }
}

/// Parse a group destination: a numeric chat id or an `@channel` username
pub fn parse_target_group(raw: &str) -> Result<Recipient, ConfigError> {
    let raw = raw.trim();
    if let Ok(id) = raw.parse::<i64>() {
        return Ok(Recipient::Id(ChatId(id)));
    }
    if raw.len() > 1 && raw.starts_with('@') {
        return Ok(Recipient::ChannelUsername(raw.to_string()));
    }
    Err(ConfigError::InvalidTargetGroup(raw.to_string()))
}

/// Parse a comma-separated list of user ids, ignoring empty entries
pub fn parse_admin_ids(raw: &str) -> Result<Vec<i64>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<i64>()
                .map_err(|_| ConfigError::InvalidAdminId(part.to_string()))
        })
        .collect()
}

//! Shared dependencies handed to every message handler

use std::sync::Arc;
use teloxide::prelude::*;

use crate::config::BotConfig;
use crate::registrant::RegistrantStore;
use crate::relay::GroupRelay;

pub struct BotContext {
    pub store: Arc<dyn RegistrantStore>,
    pub relay: GroupRelay,
    /// Users allowed to run `/shareall`; empty means everyone
    pub admin_ids: Vec<i64>,
}

impl BotContext {
    pub fn new(store: Arc<dyn RegistrantStore>, relay: GroupRelay, admin_ids: Vec<i64>) -> Self {
        Self {
            store,
            relay,
            admin_ids,
        }
    }

    pub fn from_config(store: Arc<dyn RegistrantStore>, config: &BotConfig) -> Self {
        Self::new(
            store,
            GroupRelay::new(config.target_group.clone(), config.relay_delay),
            config.admin_ids.clone(),
        )
    }

    pub fn is_admin(&self, session_id: i64) -> bool {
        self.admin_ids.is_empty() || self.admin_ids.contains(&session_id)
    }
}

/// Who sent a message and where to answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatSession {
    pub chat_id: ChatId,
    /// Telegram user id of the sender; the registrant key
    pub session_id: i64,
    pub language_code: Option<String>,
}

impl ChatSession {
    pub fn from_message(msg: &Message) -> Self {
        let session_id = msg
            .from
            .as_ref()
            .map(|user| user.id.0 as i64)
            .unwrap_or(msg.chat.id.0);
        let language_code = msg
            .from
            .as_ref()
            .and_then(|user| user.language_code.clone());

        Self {
            chat_id: msg.chat.id,
            session_id,
            language_code,
        }
    }

    pub fn lang(&self) -> Option<&str> {
        self.language_code.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registrant::InMemoryRegistrantStore;

    #[test]
    fn test_empty_admin_list_allows_everyone() {
        let ctx = BotContext::new(
            Arc::new(InMemoryRegistrantStore::new()),
            GroupRelay::default(),
            Vec::new(),
        );
        assert!(ctx.is_admin(1));
    }

    #[test]
    fn test_admin_list_restricts() {
        let ctx = BotContext::new(
            Arc::new(InMemoryRegistrantStore::new()),
            GroupRelay::default(),
            vec![42],
        );
        assert!(ctx.is_admin(42));
        assert!(!ctx.is_admin(7));
    }

    #[test]
    fn test_relay_follows_target_group_setting() {
        let mut config = BotConfig {
            bot_token: "123:abc".to_string(),
            database_url: "postgres://localhost/matchbooking".to_string(),
            target_group: None,
            admin_ids: vec![42],
            relay_delay: std::time::Duration::ZERO,
        };

        let ctx = BotContext::from_config(Arc::new(InMemoryRegistrantStore::new()), &config);
        assert!(!ctx.relay.is_enabled());
        assert_eq!(ctx.admin_ids, vec![42]);

        config.target_group = Some(teloxide::types::Recipient::Id(ChatId(-100)));
        let ctx = BotContext::from_config(Arc::new(InMemoryRegistrantStore::new()), &config);
        assert!(ctx.relay.is_enabled());
    }
}

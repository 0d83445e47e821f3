//! Bot module for handling Telegram interactions
//!
//! This module is split into several submodules:
//! - `event`: Resolves raw Telegram messages into inbound events
//! - `context`: Shared handler dependencies and the sender's session
//! - `message_handler`: Dispatcher endpoint and the registration state machine
//! - `command_handler`: Handles bot commands
//! - `ui_builder`: Formats replies and the command menu

pub mod command_handler;
pub mod context;
pub mod event;
pub mod message_handler;
pub mod ui_builder;

// Re-export main handler functions for use in main.rs
pub use context::{BotContext, ChatSession};
pub use message_handler::{handle_event, message_handler};
pub use ui_builder::command_menu;

//! # Matchbooking Registration Bot
//!
//! A Telegram bot that walks a user through a two-step registration
//! (name, then photo), stores the result in Postgres and relays the photo
//! to a shared group chat.

pub mod bot;
pub mod config;
pub mod db;
pub mod dialogue;
pub mod errors;
pub mod localization;
pub mod registrant;
pub mod relay;
pub mod transport;

//! Telegram Bot API transport.
//!
//! - `types` - wire types
//! - `client` - HTTP client, also the bot's `ConversationChannel`
//! - `dispatch` - update -> dialog routing
//! - `webhook` - push-style delivery over actix-web
//! - `polling` - pull-style delivery via `getUpdates`

pub mod client;
pub mod dispatch;
pub mod polling;
pub mod types;
pub mod webhook;

pub use client::TelegramClient;

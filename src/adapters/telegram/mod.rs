//! Telegram Bot API adapters: outbound transport and update polling.

mod bot_api;
mod updates;

pub use bot_api::{BotApiClient, BotApiConfig, DEFAULT_API_BASE_URL};
pub use updates::{next_offset, TelegramMessage, TelegramUser, Update, UpdatePoller};

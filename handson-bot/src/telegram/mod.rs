//! Telegram channel: adapters, [`bot_core::Bot`] implementation, REPL runner.

mod adapters;
mod bot_adapter;
mod runner;

pub use adapters::{TelegramMessageWrapper, TelegramUserWrapper, TELEGRAM_CHANNEL_ID};
pub use bot_adapter::{parse_chat_id, TelegramBotAdapter};
pub use runner::run_repl;

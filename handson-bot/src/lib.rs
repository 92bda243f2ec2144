//! # handson-bot
//!
//! Sample bot: welcomes new members, asks once for a handle name (three characters or more,
//! stored upper-cased in user state) and greets the user by that name afterwards.
//! Runs on Telegram or on the console.

pub mod cli;
pub mod components;
pub mod config;
pub mod console;
pub mod messages;
pub mod profile;
pub mod profile_store;
pub mod runner;
pub mod sample_bot;
pub mod telegram;
pub mod validator;

pub use cli::{Cli, Commands};
pub use components::{build_bot_components, build_sample_bot, create_storage, BotComponents};
pub use config::{BotConfig, StateStoreKind};
pub use console::{run_console, ConsoleBot, ConsoleSession};
pub use profile::UserProfile;
pub use profile_store::ProfileStore;
pub use runner::{run_bot, run_console_bot};
pub use sample_bot::{SampleBot, NAME_PROMPT_ID};
pub use validator::{canonicalize_handle_name, validate_handle_name, MIN_HANDLE_NAME_LEN};

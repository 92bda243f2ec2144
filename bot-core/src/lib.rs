//! # bot-core
//!
//! Core types and traits for the bot: [`Activity`], [`Bot`], [`TurnHandler`], [`TurnContext`],
//! and tracing initialization. Transport-agnostic; used by bot-state, dialogs, bot-adapter and the channels.

pub mod bot;
pub mod context;
pub mod error;
pub mod handler;
pub mod logger;
pub mod types;

pub use bot::Bot;
pub use context::{TurnContext, TurnState};
pub use error::{BotError, Result};
pub use handler::TurnHandler;
pub use logger::init_tracing;
pub use tokio_util::sync::CancellationToken;
pub use types::{
    Activity, ActivityType, ChannelAccount, ConversationAccount, ResourceResponse, ToActivity,
};

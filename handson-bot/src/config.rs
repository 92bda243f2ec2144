//! Bot configuration: Telegram connection, logging, state store. Loaded from env.

use anyhow::{Context, Result};
use std::env;
use std::fmt;
use std::str::FromStr;

/// Backend used for conversation and user state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateStoreKind {
    Memory,
    Sqlite,
}

impl FromStr for StateStoreKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "sqlite" => Ok(Self::Sqlite),
            other => anyhow::bail!("STATE_STORE must be 'memory' or 'sqlite', got '{}'", other),
        }
    }
}

impl fmt::Display for StateStoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Memory => f.write_str("memory"),
            Self::Sqlite => f.write_str("sqlite"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct BotConfig {
    /// BOT_TOKEN; only the Telegram channel needs it.
    pub bot_token: Option<String>,
    /// TELEGRAM_API_URL or TELOXIDE_API_URL
    pub telegram_api_url: Option<String>,
    /// LOG_FILE
    pub log_file: String,
    /// STATE_STORE
    pub state_store: StateStoreKind,
    /// STATE_DATABASE_URL, used when `state_store` is sqlite
    pub state_database_url: String,
}

impl BotConfig {
    /// Load from environment variables. `token` overrides BOT_TOKEN if provided.
    pub fn load(token: Option<String>) -> Result<Self> {
        let bot_token = token.or_else(|| env::var("BOT_TOKEN").ok());
        let telegram_api_url = env::var("TELEGRAM_API_URL")
            .or_else(|_| env::var("TELOXIDE_API_URL"))
            .ok();
        let log_file =
            env::var("LOG_FILE").unwrap_or_else(|_| "logs/handson-bot.log".to_string());
        let state_store = match env::var("STATE_STORE") {
            Ok(value) => value.parse().context("Invalid STATE_STORE")?,
            Err(_) => StateStoreKind::Memory,
        };
        let state_database_url = env::var("STATE_DATABASE_URL")
            .unwrap_or_else(|_| "./data/handson_bot.db".to_string());

        Ok(Self {
            bot_token,
            telegram_api_url,
            log_file,
            state_store,
            state_database_url,
        })
    }

    /// Validate config (e.g. telegram_api_url must be a valid URL if set).
    pub fn validate(&self) -> Result<()> {
        if let Some(ref url_str) = self.telegram_api_url {
            if reqwest::Url::parse(url_str).is_err() {
                anyhow::bail!(
                    "TELEGRAM_API_URL (or TELOXIDE_API_URL) is set but not a valid URL: {}",
                    url_str
                );
            }
        }
        Ok(())
    }

    /// The Telegram token, or an error naming the missing variable.
    pub fn require_token(&self) -> Result<&str> {
        self.bot_token
            .as_deref()
            .filter(|token| !token.is_empty())
            .ok_or_else(|| anyhow::anyhow!("BOT_TOKEN not set"))
    }
}

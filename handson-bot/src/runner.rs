//! Entry points: validate config, init tracing, build components, then run a channel.

use crate::components::{build_bot_components, build_sample_bot, create_storage};
use crate::config::BotConfig;
use crate::console::{run_stdio, ConsoleSession};
use crate::telegram::{run_repl, TelegramBotAdapter};
use anyhow::{Context, Result};
use bot_adapter::{BotAdapter, LoggingMiddleware};
use bot_core::{init_tracing, CancellationToken, TurnHandler};
use std::sync::Arc;
use tracing::{error, info, instrument};

/// Creates the teloxide bot, pointing it at TELEGRAM_API_URL when set.
pub fn create_teloxide_bot(config: &BotConfig) -> Result<teloxide::Bot> {
    let bot = teloxide::Bot::new(config.require_token()?);
    match config.telegram_api_url {
        Some(ref url_str) => {
            let url = reqwest::Url::parse(url_str)
                .with_context(|| format!("Invalid TELEGRAM_API_URL: {}", url_str))?;
            Ok(bot.set_api_url(url))
        }
        None => Ok(bot),
    }
}

async fn build_handler(config: &BotConfig) -> Result<Arc<dyn TurnHandler>> {
    let storage = create_storage(config).await?;
    let components = build_bot_components(storage);
    Ok(Arc::new(build_sample_bot(&components)))
}

fn cancel_on_ctrl_c(cancel: &CancellationToken) {
    let cancel = cancel.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl-C");
            return;
        }
        info!("Ctrl-C received, shutting down");
        cancel.cancel();
    });
}

/// Runs the sample bot on Telegram until the REPL stops.
#[instrument(skip(config))]
pub async fn run_bot(config: BotConfig) -> Result<()> {
    config.validate()?;
    init_tracing(&config.log_file)?;

    info!(
        state_store = %config.state_store,
        log_file = %config.log_file,
        "Initializing bot"
    );

    let teloxide_bot = create_teloxide_bot(&config)?;
    let handler = build_handler(&config).await?;
    let adapter = BotAdapter::new(Arc::new(TelegramBotAdapter::new(teloxide_bot.clone())))
        .use_middleware(Arc::new(LoggingMiddleware));

    info!("Bot started successfully");
    run_repl(teloxide_bot, adapter, handler, CancellationToken::new()).await
}

/// Runs the sample bot on stdin/stdout as `user_id`.
#[instrument(skip(config))]
pub async fn run_console_bot(config: BotConfig, user_id: &str) -> Result<()> {
    config.validate()?;
    init_tracing(&config.log_file)?;

    info!(state_store = %config.state_store, user_id, "Initializing console bot");

    let handler = build_handler(&config).await?;
    let session = ConsoleSession::new(user_id);
    let cancel = CancellationToken::new();
    cancel_on_ctrl_c(&cancel);

    run_stdio(handler.as_ref(), &session, &cancel).await
}

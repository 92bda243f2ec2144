//! REPL runner: converts teloxide messages to activities and passes them through the BotAdapter.
//! Calls get_me first so the bot's own account can be set as the activity recipient.

use anyhow::{Context, Result};
use bot_adapter::BotAdapter;
use bot_core::{CancellationToken, ChannelAccount, ToActivity, TurnHandler};
use std::sync::Arc;
use teloxide::prelude::*;
use tracing::{error, info, instrument};

use super::adapters::{TelegramMessageWrapper, TelegramUserWrapper};

/// Starts the REPL. Updates of one chat are handled one at a time, so turns of a conversation
/// never race on its state.
#[instrument(skip(bot, adapter, handler, cancel))]
pub async fn run_repl(
    bot: teloxide::Bot,
    adapter: BotAdapter,
    handler: Arc<dyn TurnHandler>,
    cancel: CancellationToken,
) -> Result<()> {
    let me = bot.get_me().await.context("Telegram getMe failed")?;
    let bot_account: ChannelAccount = TelegramUserWrapper(&me.user).to_account();
    info!(bot_id = %bot_account.id, username = ?bot_account.name, "Bot account resolved");

    let repl_cancel = cancel.clone();
    teloxide::repl(bot, move |_bot: Bot, msg: Message| {
        let adapter = adapter.clone();
        let handler = Arc::clone(&handler);
        let bot_account = bot_account.clone();
        let cancel = repl_cancel.clone();

        async move {
            let activity = TelegramMessageWrapper(&msg, &bot_account).to_activity();
            let user_id = activity.from.id.clone();
            let chat_id = msg.chat.id.0;

            if let Err(e) = adapter
                .process_activity(activity, handler.as_ref(), &cancel)
                .await
            {
                error!(error = %e, user_id = %user_id, chat_id, "Turn failed");
            }
            respond(())
        }
    })
    .await;

    cancel.cancel();
    info!("Telegram REPL stopped");
    Ok(())
}

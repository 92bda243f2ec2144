//! Console channel: stdin lines become message activities, replies are printed to stdout.
//! A conversation update adding the user is sent first, as a real channel would on join.

use anyhow::Result;
use async_trait::async_trait;
use bot_adapter::{BotAdapter, LoggingMiddleware};
use bot_core::{
    Activity, Bot, CancellationToken, ChannelAccount, ConversationAccount, ResourceResponse,
    TurnHandler,
};
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::Mutex;
use tracing::{error, info};

pub const CONSOLE_CHANNEL_ID: &str = "console";
const EXIT_COMMANDS: [&str; 2] = ["exit", "quit"];

/// Writes each outbound message as one `Bot: ...` line.
pub struct ConsoleBot<W> {
    out: Mutex<W>,
}

impl<W> ConsoleBot<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }
}

#[async_trait]
impl<W: AsyncWrite + Unpin + Send> Bot for ConsoleBot<W> {
    async fn send_activity(&self, activity: &Activity) -> bot_core::Result<ResourceResponse> {
        if let Some(text) = activity.text.as_deref() {
            let mut out = self.out.lock().await;
            out.write_all(format!("Bot: {}\n", text).as_bytes()).await?;
            out.flush().await?;
        }
        Ok(ResourceResponse {
            id: activity.id.clone(),
        })
    }
}

/// Accounts used for one console session.
#[derive(Debug, Clone)]
pub struct ConsoleSession {
    pub user: ChannelAccount,
    pub bot: ChannelAccount,
    pub conversation: ConversationAccount,
}

impl ConsoleSession {
    pub fn new(user_id: &str) -> Self {
        Self {
            user: ChannelAccount::new(user_id, Some(user_id.to_string())),
            bot: ChannelAccount::new("sample-bot", Some("SampleBot".to_string())),
            conversation: ConversationAccount {
                id: format!("console-{}", user_id),
                is_group: false,
            },
        }
    }

    fn join_activity(&self) -> Activity {
        Activity::conversation_update(
            CONSOLE_CHANNEL_ID,
            self.user.clone(),
            self.bot.clone(),
            self.conversation.clone(),
            vec![self.user.clone(), self.bot.clone()],
            Vec::new(),
        )
    }

    fn message_activity(&self, text: &str) -> Activity {
        Activity::message(
            CONSOLE_CHANNEL_ID,
            self.user.clone(),
            self.bot.clone(),
            self.conversation.clone(),
            text,
        )
    }
}

async fn run_turn(
    adapter: &BotAdapter,
    handler: &dyn TurnHandler,
    activity: Activity,
    cancel: &CancellationToken,
) {
    let user_id = activity.from.id.clone();
    if let Err(e) = adapter.process_activity(activity, handler, cancel).await {
        error!(error = %e, user_id = %user_id, "Turn failed");
    }
}

/// Reads lines from `input` until EOF, `exit`/`quit`, or cancellation. Blank lines are skipped.
pub async fn run_console<R>(
    input: R,
    adapter: &BotAdapter,
    handler: &dyn TurnHandler,
    session: &ConsoleSession,
    cancel: &CancellationToken,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
{
    info!(user_id = %session.user.id, "Console session started");
    run_turn(adapter, handler, session.join_activity(), cancel).await;

    let mut lines = input.lines();
    loop {
        let line = tokio::select! {
            _ = cancel.cancelled() => break,
            line = lines.next_line() => line?,
        };
        let Some(line) = line else { break };
        let text = line.trim();
        if text.is_empty() {
            continue;
        }
        if EXIT_COMMANDS.contains(&text) {
            break;
        }
        run_turn(adapter, handler, session.message_activity(text), cancel).await;
    }

    info!(user_id = %session.user.id, "Console session ended");
    Ok(())
}

/// Runs the console channel on the process stdin/stdout.
pub async fn run_stdio(
    handler: &dyn TurnHandler,
    session: &ConsoleSession,
    cancel: &CancellationToken,
) -> Result<()> {
    let bot = Arc::new(ConsoleBot::new(tokio::io::stdout()));
    let adapter = BotAdapter::new(bot).use_middleware(Arc::new(LoggingMiddleware));
    let input = BufReader::new(tokio::io::stdin());
    run_console(input, &adapter, handler, session, cancel).await
}

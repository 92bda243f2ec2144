//! Wraps teloxide::Bot and implements [`bot_core::Bot`]. Production code sends via Telegram; tests substitute another Bot impl.

use async_trait::async_trait;
use bot_core::{Activity, ActivityType, Bot as CoreBot, BotError, ResourceResponse, Result};
use teloxide::{prelude::*, types::ChatAction, types::ChatId};

/// Thin wrapper around teloxide::Bot that implements bot-core's Bot trait.
pub struct TelegramBotAdapter {
    bot: teloxide::Bot,
}

/// Parses a conversation id into a Telegram chat id.
pub fn parse_chat_id(conversation_id: &str) -> Result<ChatId> {
    conversation_id
        .parse()
        .map(ChatId)
        .map_err(|_| BotError::Transport(format!("Invalid Telegram chat id: {}", conversation_id)))
}

impl TelegramBotAdapter {
    /// Creates an adapter from an existing teloxide Bot.
    pub fn new(bot: teloxide::Bot) -> Self {
        Self { bot }
    }

    /// Returns the underlying teloxide::Bot for direct API use when needed.
    pub fn inner(&self) -> &teloxide::Bot {
        &self.bot
    }
}

#[async_trait]
impl CoreBot for TelegramBotAdapter {
    async fn send_activity(&self, activity: &Activity) -> Result<ResourceResponse> {
        let chat_id = parse_chat_id(&activity.conversation.id)?;
        match (&activity.activity_type, activity.text.as_deref()) {
            (ActivityType::Message, Some(text)) => {
                let sent = self
                    .bot
                    .send_message(chat_id, text.to_string())
                    .await
                    .map_err(|e| BotError::Transport(e.to_string()))?;
                Ok(ResourceResponse {
                    id: sent.id.to_string(),
                })
            }
            (ActivityType::Typing, _) => {
                self.bot
                    .send_chat_action(chat_id, ChatAction::Typing)
                    .await
                    .map_err(|e| BotError::Transport(e.to_string()))?;
                Ok(ResourceResponse {
                    id: activity.id.clone(),
                })
            }
            (other, _) => Err(BotError::Transport(format!(
                "Telegram channel cannot send {} activities without text",
                other
            ))),
        }
    }
}

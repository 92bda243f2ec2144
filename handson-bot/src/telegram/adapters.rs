//! Adapters from Telegram (teloxide) types to bot_core activities.
//!
//! A message carrying `new_chat_members` / `left_chat_member` becomes a `conversationUpdate`;
//! `/start` in a private chat also becomes one (Telegram sends no join event there).
//! Text becomes a `message`; anything else becomes an `event` named after its content kind.

use bot_core::{Activity, ChannelAccount, ConversationAccount, ToActivity};

pub const TELEGRAM_CHANNEL_ID: &str = "telegram";

/// Channel-neutral view of one Telegram message, extracted before mapping.
#[derive(Debug, Clone)]
pub(crate) struct TelegramUpdate {
    pub message_id: String,
    pub chat_id: i64,
    pub is_group: bool,
    pub from: Option<ChannelAccount>,
    pub text: Option<String>,
    pub new_members: Vec<ChannelAccount>,
    pub left_member: Option<ChannelAccount>,
    pub kind: &'static str,
}

/// Wraps a teloxide User for conversion to a [`ChannelAccount`].
pub struct TelegramUserWrapper<'a>(pub &'a teloxide::types::User);

impl<'a> TelegramUserWrapper<'a> {
    pub fn to_account(&self) -> ChannelAccount {
        let name = self
            .0
            .username
            .clone()
            .unwrap_or_else(|| self.0.first_name.clone());
        ChannelAccount::new(self.0.id.0.to_string(), Some(name))
    }
}

/// Wraps a teloxide Message plus the bot's own account (the activity recipient).
pub struct TelegramMessageWrapper<'a>(pub &'a teloxide::types::Message, pub &'a ChannelAccount);

impl<'a> TelegramMessageWrapper<'a> {
    fn kind(&self) -> &'static str {
        let msg = self.0;
        if msg.photo().is_some() {
            "photo"
        } else if msg.sticker().is_some() {
            "sticker"
        } else if msg.document().is_some() {
            "document"
        } else if msg.voice().is_some() {
            "voice"
        } else if msg.video().is_some() {
            "video"
        } else if msg.location().is_some() {
            "location"
        } else {
            "other"
        }
    }

    fn to_update(&self) -> TelegramUpdate {
        let msg = self.0;
        TelegramUpdate {
            message_id: msg.id.to_string(),
            chat_id: msg.chat.id.0,
            is_group: msg.chat.is_group() || msg.chat.is_supergroup(),
            from: msg.from.as_ref().map(|u| TelegramUserWrapper(u).to_account()),
            text: msg.text().map(str::to_string),
            new_members: msg
                .new_chat_members()
                .map(|users| {
                    users
                        .iter()
                        .map(|u| TelegramUserWrapper(u).to_account())
                        .collect()
                })
                .unwrap_or_default(),
            left_member: msg
                .left_chat_member()
                .map(|u| TelegramUserWrapper(u).to_account()),
            kind: self.kind(),
        }
    }
}

impl<'a> ToActivity for TelegramMessageWrapper<'a> {
    fn to_activity(&self) -> Activity {
        build_activity(self.to_update(), self.1)
    }
}

fn is_start_command(text: &str) -> bool {
    let command = text.split_whitespace().next().unwrap_or("");
    command == "/start" || command.starts_with("/start@")
}

pub(crate) fn build_activity(update: TelegramUpdate, bot: &ChannelAccount) -> Activity {
    let from = update
        .from
        .unwrap_or_else(|| ChannelAccount::new(update.chat_id.to_string(), None));
    let conversation = ConversationAccount {
        id: update.chat_id.to_string(),
        is_group: update.is_group,
    };

    let mut activity = if !update.new_members.is_empty() || update.left_member.is_some() {
        Activity::conversation_update(
            TELEGRAM_CHANNEL_ID,
            from,
            bot.clone(),
            conversation,
            update.new_members,
            update.left_member.into_iter().collect(),
        )
    } else {
        match update.text {
            Some(text) if !update.is_group && is_start_command(&text) => {
                let members = vec![from.clone(), bot.clone()];
                Activity::conversation_update(
                    TELEGRAM_CHANNEL_ID,
                    from,
                    bot.clone(),
                    conversation,
                    members,
                    Vec::new(),
                )
            }
            Some(text) => Activity::message(TELEGRAM_CHANNEL_ID, from, bot.clone(), conversation, text),
            None => Activity::event(TELEGRAM_CHANNEL_ID, from, bot.clone(), conversation, update.kind),
        }
    };
    activity.id = update.message_id;
    activity
}

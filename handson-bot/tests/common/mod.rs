//! Recording bot and activity builders for end-to-end turns.

#![allow(dead_code)]

use async_trait::async_trait;
use bot_core::{
    Activity, Bot, ChannelAccount, ConversationAccount, ResourceResponse, Result,
};
use std::sync::Mutex;

pub const CHANNEL: &str = "test";
pub const BOT_ID: &str = "bot";
pub const CONVERSATION_ID: &str = "conv-1";

/// Keeps the text of every sent activity.
#[derive(Default)]
pub struct RecordingBot {
    sent: Mutex<Vec<String>>,
}

impl RecordingBot {
    /// Returns and clears the texts sent so far.
    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.sent.lock().unwrap())
    }
}

#[async_trait]
impl Bot for RecordingBot {
    async fn send_activity(&self, activity: &Activity) -> Result<ResourceResponse> {
        self.sent
            .lock()
            .unwrap()
            .push(activity.text.clone().unwrap_or_default());
        Ok(ResourceResponse {
            id: activity.id.clone(),
        })
    }
}

fn bot_account() -> ChannelAccount {
    ChannelAccount::new(BOT_ID, Some("SampleBot".to_string()))
}

fn conversation() -> ConversationAccount {
    ConversationAccount {
        id: CONVERSATION_ID.to_string(),
        is_group: false,
    }
}

pub fn message(user_id: &str, text: &str) -> Activity {
    Activity::message(
        CHANNEL,
        ChannelAccount::new(user_id, None),
        bot_account(),
        conversation(),
        text,
    )
}

/// Conversation update adding `member_ids` (use [`BOT_ID`] for the bot itself).
pub fn members_added(user_id: &str, member_ids: &[&str]) -> Activity {
    Activity::conversation_update(
        CHANNEL,
        ChannelAccount::new(user_id, None),
        bot_account(),
        conversation(),
        member_ids
            .iter()
            .map(|id| ChannelAccount::new(*id, None))
            .collect(),
        Vec::new(),
    )
}

pub fn typing(user_id: &str) -> Activity {
    let mut activity = message(user_id, "");
    activity.activity_type = bot_core::ActivityType::Typing;
    activity.text = None;
    activity
}

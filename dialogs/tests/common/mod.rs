//! Recording [`Bot`] for dialog tests: keeps the text of every sent activity.

use async_trait::async_trait;
use bot_core::{
    Activity, Bot, ChannelAccount, ConversationAccount, ResourceResponse, Result, TurnContext,
};
use std::sync::{Arc, Mutex};

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

pub fn message_turn(bot: &Arc<RecordingBot>, text: &str) -> TurnContext {
    let activity = Activity::message(
        "test",
        ChannelAccount::new("user-1", None),
        ChannelAccount::new("bot", None),
        ConversationAccount {
            id: "conv-1".to_string(),
            is_group: false,
        },
        text,
    );
    TurnContext::new(bot.clone(), activity)
}

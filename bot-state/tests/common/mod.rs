//! Shared helpers: a no-op [`Bot`] and activity builders.

use async_trait::async_trait;
use bot_core::{
    Activity, Bot, ChannelAccount, ConversationAccount, ResourceResponse, Result, TurnContext,
};
use std::sync::Arc;

/// Bot that accepts every activity and sends nothing.
pub struct NullBot;

#[async_trait]
impl Bot for NullBot {
    async fn send_activity(&self, activity: &Activity) -> Result<ResourceResponse> {
        Ok(ResourceResponse {
            id: activity.id.clone(),
        })
    }
}

/// Builds a turn context for a message from `user_id` in `conversation_id`.
pub fn turn(user_id: &str, conversation_id: &str) -> TurnContext {
    let activity = Activity::message(
        "test",
        ChannelAccount::new(user_id, None),
        ChannelAccount::new("bot", None),
        ConversationAccount {
            id: conversation_id.to_string(),
            is_group: false,
        },
        "hello",
    );
    TurnContext::new(Arc::new(NullBot), activity)
}

//! Core types: activity, accounts, and the conversions channels implement.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Kind of an activity. `Display` yields the wire name (`message`, `conversationUpdate`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActivityType {
    Message,
    ConversationUpdate,
    Typing,
    EndOfConversation,
    Event,
    #[serde(untagged)]
    Other(String),
}

impl fmt::Display for ActivityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ActivityType::Message => "message",
            ActivityType::ConversationUpdate => "conversationUpdate",
            ActivityType::Typing => "typing",
            ActivityType::EndOfConversation => "endOfConversation",
            ActivityType::Event => "event",
            ActivityType::Other(name) => name.as_str(),
        };
        f.write_str(name)
    }
}

/// A participant (user or bot) on a channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelAccount {
    pub id: String,
    pub name: Option<String>,
}

impl ChannelAccount {
    pub fn new(id: impl Into<String>, name: Option<String>) -> Self {
        Self {
            id: id.into(),
            name,
        }
    }
}

/// Conversation (chat) identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationAccount {
    pub id: String,
    pub is_group: bool,
}

/// One inbound or outbound event of a turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Activity {
    pub id: String,
    pub activity_type: ActivityType,
    pub channel_id: String,
    pub from: ChannelAccount,
    /// For inbound activities this is the bot itself.
    pub recipient: ChannelAccount,
    pub conversation: ConversationAccount,
    pub members_added: Vec<ChannelAccount>,
    pub members_removed: Vec<ChannelAccount>,
    pub text: Option<String>,
    /// Event name for `Event` activities.
    pub name: Option<String>,
    pub reply_to_id: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl Activity {
    fn new(
        activity_type: ActivityType,
        channel_id: &str,
        from: ChannelAccount,
        recipient: ChannelAccount,
        conversation: ConversationAccount,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            activity_type,
            channel_id: channel_id.to_string(),
            from,
            recipient,
            conversation,
            members_added: Vec::new(),
            members_removed: Vec::new(),
            text: None,
            name: None,
            reply_to_id: None,
            timestamp: Utc::now(),
        }
    }

    /// Creates a text message activity.
    pub fn message(
        channel_id: &str,
        from: ChannelAccount,
        recipient: ChannelAccount,
        conversation: ConversationAccount,
        text: impl Into<String>,
    ) -> Self {
        let mut activity = Self::new(ActivityType::Message, channel_id, from, recipient, conversation);
        activity.text = Some(text.into());
        activity
    }

    /// Creates a membership-change activity.
    pub fn conversation_update(
        channel_id: &str,
        from: ChannelAccount,
        recipient: ChannelAccount,
        conversation: ConversationAccount,
        members_added: Vec<ChannelAccount>,
        members_removed: Vec<ChannelAccount>,
    ) -> Self {
        let mut activity = Self::new(
            ActivityType::ConversationUpdate,
            channel_id,
            from,
            recipient,
            conversation,
        );
        activity.members_added = members_added;
        activity.members_removed = members_removed;
        activity
    }

    /// Creates a named event activity (used for channel updates with no better mapping).
    pub fn event(
        channel_id: &str,
        from: ChannelAccount,
        recipient: ChannelAccount,
        conversation: ConversationAccount,
        name: impl Into<String>,
    ) -> Self {
        let mut activity = Self::new(ActivityType::Event, channel_id, from, recipient, conversation);
        activity.name = Some(name.into());
        activity
    }

    /// Outgoing message in the same conversation, addressed back to the sender.
    pub fn create_reply(&self, text: impl Into<String>) -> Self {
        let mut reply = Self::new(
            ActivityType::Message,
            &self.channel_id,
            self.recipient.clone(),
            self.from.clone(),
            self.conversation.clone(),
        );
        reply.text = Some(text.into());
        reply.reply_to_id = Some(self.id.clone());
        reply
    }

    /// Message text, or "" when absent.
    pub fn text_or_empty(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }
}

/// Result of sending an activity: the id the channel assigned to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceResponse {
    pub id: String,
}

/// Converts a channel-specific update into an [`Activity`].
pub trait ToActivity: Send + Sync {
    fn to_activity(&self) -> Activity;
}

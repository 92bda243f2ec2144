//! Per-turn context: the inbound activity, the outbound [`Bot`], and a turn-scoped state bag.

use crate::bot::Bot;
use crate::error::Result;
use crate::types::{Activity, ResourceResponse};
use std::any::Any;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

/// Values cached for the duration of one turn, keyed by name. Dropped with the context.
#[derive(Default)]
pub struct TurnState {
    values: Mutex<HashMap<String, Box<dyn Any + Send + Sync>>>,
}

impl TurnState {
    fn lock(&self) -> MutexGuard<'_, HashMap<String, Box<dyn Any + Send + Sync>>> {
        // Poisoning is ignored; values are plain data.
        self.values.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Returns a clone of the value under `key` if present and of type `T`.
    pub fn get<T: Clone + 'static>(&self, key: &str) -> Option<T> {
        self.lock()
            .get(key)
            .and_then(|value| value.downcast_ref::<T>())
            .cloned()
    }

    pub fn insert<T: Any + Send + Sync>(&self, key: &str, value: T) {
        self.lock().insert(key.to_string(), Box::new(value));
    }

    pub fn remove(&self, key: &str) -> bool {
        self.lock().remove(key).is_some()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.lock().contains_key(key)
    }
}

/// Context for a single turn. Created by the adapter, borrowed by handlers.
pub struct TurnContext {
    bot: Arc<dyn Bot>,
    activity: Activity,
    turn_state: TurnState,
    responded: AtomicBool,
}

impl TurnContext {
    pub fn new(bot: Arc<dyn Bot>, activity: Activity) -> Self {
        Self {
            bot,
            activity,
            turn_state: TurnState::default(),
            responded: AtomicBool::new(false),
        }
    }

    pub fn activity(&self) -> &Activity {
        &self.activity
    }

    pub fn turn_state(&self) -> &TurnState {
        &self.turn_state
    }

    /// True once anything has been sent during this turn.
    pub fn responded(&self) -> bool {
        self.responded.load(Ordering::SeqCst)
    }

    /// Sends a text reply to the sender of the inbound activity.
    pub async fn send_activity(&self, text: &str) -> Result<ResourceResponse> {
        let reply = self.activity.create_reply(text);
        self.send_activity_with(&reply).await
    }

    /// Sends a fully built activity.
    pub async fn send_activity_with(&self, activity: &Activity) -> Result<ResourceResponse> {
        debug!(
            conversation_id = %activity.conversation.id,
            activity_type = %activity.activity_type,
            "Sending activity"
        );
        let response = self.bot.send_activity(activity).await?;
        self.responded.store(true, Ordering::SeqCst);
        Ok(response)
    }
}

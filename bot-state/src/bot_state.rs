//! Conversation- and user-scoped state backed by a [`Storage`].
//!
//! State is loaded once per turn into the turn context, mutated through
//! [`StatePropertyAccessor`]s and written back by `save_changes` when it changed.

use crate::property_accessor::StatePropertyAccessor;
use crate::storage::{Storage, ETAG_KEY};
use async_trait::async_trait;
use bot_core::{Activity, BotError, Result, TurnContext};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Which identity a [`BotState`] is keyed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateScope {
    Conversation,
    User,
}

impl StateScope {
    /// Name under which the cached state lives in the turn context.
    pub fn context_key(&self) -> &'static str {
        match self {
            StateScope::Conversation => "ConversationState",
            StateScope::User => "UserState",
        }
    }

    /// Storage key for the activity: `{channel}/conversations/{id}` or `{channel}/users/{id}`.
    pub fn storage_key(&self, activity: &Activity) -> Result<String> {
        if activity.channel_id.is_empty() {
            return Err(BotError::State("activity is missing channel_id".to_string()));
        }
        match self {
            StateScope::Conversation => {
                if activity.conversation.id.is_empty() {
                    return Err(BotError::State(
                        "activity is missing conversation.id".to_string(),
                    ));
                }
                Ok(format!(
                    "{}/conversations/{}",
                    activity.channel_id, activity.conversation.id
                ))
            }
            StateScope::User => {
                if activity.from.id.is_empty() {
                    return Err(BotError::State("activity is missing from.id".to_string()));
                }
                Ok(format!("{}/users/{}", activity.channel_id, activity.from.id))
            }
        }
    }
}

#[derive(Debug, Clone)]
struct CachedBotState {
    state: Map<String, Value>,
    hash: String,
}

impl CachedBotState {
    fn new(state: Map<String, Value>) -> Self {
        let hash = Self::compute_hash(&state);
        Self { state, hash }
    }

    fn compute_hash(state: &Map<String, Value>) -> String {
        serde_json::to_string(state).unwrap_or_default()
    }

    fn is_changed(&self) -> bool {
        Self::compute_hash(&self.state) != self.hash
    }
}

/// Save hook shared by every state scope, so handlers can hold scopes as trait objects.
#[async_trait]
pub trait PersistentState: Send + Sync {
    fn scope(&self) -> StateScope;
    async fn load(&self, ctx: &TurnContext, force: bool) -> Result<()>;
    async fn save_changes(&self, ctx: &TurnContext, force: bool) -> Result<()>;
}

pub struct BotState {
    storage: Arc<dyn Storage>,
    scope: StateScope,
}

impl BotState {
    pub fn new(storage: Arc<dyn Storage>, scope: StateScope) -> Self {
        Self { storage, scope }
    }

    pub fn conversation(storage: Arc<dyn Storage>) -> Self {
        Self::new(storage, StateScope::Conversation)
    }

    pub fn user(storage: Arc<dyn Storage>) -> Self {
        Self::new(storage, StateScope::User)
    }

    pub fn scope(&self) -> StateScope {
        self.scope
    }

    /// Creates a typed accessor for the property `name` of this scope.
    pub fn create_property<T>(self: &Arc<Self>, name: &str) -> StatePropertyAccessor<T> {
        StatePropertyAccessor::new(Arc::clone(self), name)
    }

    fn cached(&self, ctx: &TurnContext) -> Option<CachedBotState> {
        ctx.turn_state().get::<CachedBotState>(self.scope.context_key())
    }

    fn store_cached(&self, ctx: &TurnContext, cached: CachedBotState) {
        ctx.turn_state().insert(self.scope.context_key(), cached);
    }

    /// Reads the document into the turn cache unless it is already there (or `force`).
    #[instrument(skip(self, ctx), fields(scope = ?self.scope))]
    pub async fn load(&self, ctx: &TurnContext, force: bool) -> Result<()> {
        if !force && ctx.turn_state().contains(self.scope.context_key()) {
            return Ok(());
        }

        let key = self.scope.storage_key(ctx.activity())?;
        let mut documents = self.storage.read(std::slice::from_ref(&key)).await?;
        let state = match documents.remove(&key) {
            Some(Value::Object(map)) => map,
            Some(_) | None => Map::new(),
        };
        debug!(key = %key, properties = state.len(), "Loaded state");
        self.store_cached(ctx, CachedBotState::new(state));
        Ok(())
    }

    /// Writes the cached document if it changed during the turn (always when `force`).
    #[instrument(skip(self, ctx), fields(scope = ?self.scope))]
    pub async fn save_changes(&self, ctx: &TurnContext, force: bool) -> Result<()> {
        let Some(mut cached) = self.cached(ctx) else {
            return Ok(());
        };
        if !force && !cached.is_changed() {
            debug!("State unchanged, skipping write");
            return Ok(());
        }

        let key = self.scope.storage_key(ctx.activity())?;
        let changes = std::iter::once((key.clone(), Value::Object(cached.state.clone()))).collect();
        let mut etags = self.storage.write(changes).await?;

        // Later writes in this turn must carry the tag the store just stamped.
        if let Some(etag) = etags.remove(&key) {
            cached.state.insert(ETAG_KEY.to_string(), Value::String(etag));
        }
        cached.hash = CachedBotState::compute_hash(&cached.state);
        self.store_cached(ctx, cached);
        debug!(key = %key, "Saved state");
        Ok(())
    }

    /// Empties the cached state; the next `save_changes` writes the empty document.
    pub fn clear(&self, ctx: &TurnContext) {
        self.store_cached(
            ctx,
            CachedBotState {
                state: Map::new(),
                hash: String::new(),
            },
        );
    }

    /// Drops the cached state and removes the stored document.
    pub async fn delete(&self, ctx: &TurnContext) -> Result<()> {
        ctx.turn_state().remove(self.scope.context_key());
        let key = self.scope.storage_key(ctx.activity())?;
        self.storage.delete(&[key]).await?;
        Ok(())
    }

    pub(crate) async fn get_property_value<T: DeserializeOwned>(
        &self,
        ctx: &TurnContext,
        name: &str,
    ) -> Result<Option<T>> {
        self.load(ctx, false).await?;
        let value = self
            .cached(ctx)
            .and_then(|cached| cached.state.get(name).cloned());
        match value {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    pub(crate) async fn set_property_value<T: Serialize>(
        &self,
        ctx: &TurnContext,
        name: &str,
        value: &T,
    ) -> Result<()> {
        self.load(ctx, false).await?;
        let mut cached = self
            .cached(ctx)
            .unwrap_or_else(|| CachedBotState::new(Map::new()));
        cached
            .state
            .insert(name.to_string(), serde_json::to_value(value)?);
        self.store_cached(ctx, cached);
        Ok(())
    }

    pub(crate) async fn delete_property_value(&self, ctx: &TurnContext, name: &str) -> Result<()> {
        self.load(ctx, false).await?;
        if let Some(mut cached) = self.cached(ctx) {
            cached.state.remove(name);
            self.store_cached(ctx, cached);
        }
        Ok(())
    }
}

#[async_trait]
impl PersistentState for BotState {
    fn scope(&self) -> StateScope {
        self.scope
    }

    async fn load(&self, ctx: &TurnContext, force: bool) -> Result<()> {
        BotState::load(self, ctx, force).await
    }

    async fn save_changes(&self, ctx: &TurnContext, force: bool) -> Result<()> {
        BotState::save_changes(self, ctx, force).await
    }
}

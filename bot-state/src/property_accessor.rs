use crate::bot_state::BotState;
use bot_core::{Result, TurnContext};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::marker::PhantomData;
use std::sync::Arc;

/// Typed handle to one named property of a [`BotState`].
pub struct StatePropertyAccessor<T> {
    state: Arc<BotState>,
    name: String,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for StatePropertyAccessor<T> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            name: self.name.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T> StatePropertyAccessor<T> {
    pub(crate) fn new(state: Arc<BotState>, name: &str) -> Self {
        Self {
            state,
            name: name.to_string(),
            _marker: PhantomData,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl<T> StatePropertyAccessor<T>
where
    T: Serialize + DeserializeOwned + Send + Sync,
{
    pub async fn get(&self, ctx: &TurnContext) -> Result<Option<T>> {
        self.state.get_property_value(ctx, &self.name).await
    }

    /// Returns the stored value, or `T::default()` which is also written into the turn cache.
    pub async fn get_or_default(&self, ctx: &TurnContext) -> Result<T>
    where
        T: Default,
    {
        if let Some(value) = self.get(ctx).await? {
            return Ok(value);
        }
        let value = T::default();
        self.set(ctx, &value).await?;
        Ok(value)
    }

    pub async fn set(&self, ctx: &TurnContext, value: &T) -> Result<()> {
        self.state.set_property_value(ctx, &self.name, value).await
    }

    pub async fn delete(&self, ctx: &TurnContext) -> Result<()> {
        self.state.delete_property_value(ctx, &self.name).await
    }
}

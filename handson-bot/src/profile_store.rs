use crate::profile::UserProfile;
use async_trait::async_trait;
use bot_core::{Result, TurnContext};
use bot_state::StatePropertyAccessor;

/// Per-user profile persistence as seen by the turn handler.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// The sender's profile, or a default one if none was stored yet.
    async fn get_or_default(&self, ctx: &TurnContext) -> Result<UserProfile>;
    /// Replaces the sender's profile; written out by the user state's `save_changes`.
    async fn save(&self, ctx: &TurnContext, profile: UserProfile) -> Result<()>;
}

#[async_trait]
impl ProfileStore for StatePropertyAccessor<UserProfile> {
    async fn get_or_default(&self, ctx: &TurnContext) -> Result<UserProfile> {
        StatePropertyAccessor::get_or_default(self, ctx).await
    }

    async fn save(&self, ctx: &TurnContext, profile: UserProfile) -> Result<()> {
        self.set(ctx, &profile).await
    }
}

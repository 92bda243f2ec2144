use crate::context::TurnContext;
use crate::error::Result;
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

/// Application logic invoked once per inbound activity.
#[async_trait]
pub trait TurnHandler: Send + Sync {
    async fn on_turn(&self, ctx: &TurnContext, cancel: &CancellationToken) -> Result<()>;
}

use crate::Middleware;
use async_trait::async_trait;
use bot_core::{Result, TurnContext};
use tracing::{debug, info, instrument};

/// Logs every inbound activity and whether the turn produced a reply.
pub struct LoggingMiddleware;

#[async_trait]
impl Middleware for LoggingMiddleware {
    #[instrument(skip(self, ctx))]
    async fn before(&self, ctx: &TurnContext) -> Result<bool> {
        let activity = ctx.activity();
        info!(
            user_id = %activity.from.id,
            username = %activity.from.name.as_deref().unwrap_or("unknown"),
            activity_type = %activity.activity_type,
            text = %activity.text_or_empty(),
            "Received activity"
        );
        Ok(true)
    }

    #[instrument(skip(self, ctx))]
    async fn after(&self, ctx: &TurnContext, handled: bool) -> Result<()> {
        debug!(
            activity_id = %ctx.activity().id,
            handled,
            responded = ctx.responded(),
            "Processed activity"
        );
        Ok(())
    }
}

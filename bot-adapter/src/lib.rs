//! # Bot adapter
//!
//! Turns an inbound [`Activity`] into a [`TurnContext`] and runs it through a middleware pipeline
//! around the turn handler. Middleware `before` hooks run in order and can stop the turn; `after`
//! hooks run in reverse order once the handler returned.

mod middleware;

pub use middleware::LoggingMiddleware;

use async_trait::async_trait;
use bot_core::{Activity, Bot, CancellationToken, Result, TurnContext, TurnHandler};
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Hook around every turn.
#[async_trait]
pub trait Middleware: Send + Sync {
    /// Runs before the handler. Return false to end the turn without calling the handler.
    async fn before(&self, _ctx: &TurnContext) -> Result<bool> {
        Ok(true)
    }
    /// Runs after the handler (reverse order). `handled` is false when a `before` stopped the turn.
    async fn after(&self, _ctx: &TurnContext, _handled: bool) -> Result<()> {
        Ok(())
    }
}

/// Outbound bot plus the middleware pipeline.
#[derive(Clone)]
pub struct BotAdapter {
    bot: Arc<dyn Bot>,
    middleware: Vec<Arc<dyn Middleware>>,
}

impl BotAdapter {
    pub fn new(bot: Arc<dyn Bot>) -> Self {
        Self {
            bot,
            middleware: Vec::new(),
        }
    }

    /// Appends a middleware (before in order, after in reverse).
    pub fn use_middleware(mut self, middleware: Arc<dyn Middleware>) -> Self {
        self.middleware.push(middleware);
        self
    }

    pub fn bot(&self) -> &Arc<dyn Bot> {
        &self.bot
    }

    /// Runs one turn. Returns whether the handler ran; errors from middleware or the handler propagate.
    #[instrument(skip(self, activity, handler, cancel), fields(activity_id = %activity.id))]
    pub async fn process_activity(
        &self,
        activity: Activity,
        handler: &dyn TurnHandler,
        cancel: &CancellationToken,
    ) -> Result<bool> {
        let ctx = TurnContext::new(Arc::clone(&self.bot), activity);
        let activity = ctx.activity();

        info!(
            user_id = %activity.from.id,
            conversation_id = %activity.conversation.id,
            activity_type = %activity.activity_type,
            "step: turn started"
        );

        // Middleware that completed `before` get their `after`, even when a later one stopped the turn.
        let mut entered = 0;
        let mut handled = true;
        for mw in &self.middleware {
            let mw_name = std::any::type_name_of_val(mw.as_ref());
            debug!(middleware = %mw_name, "step: middleware before");
            let should_continue = mw.before(&ctx).await?;
            entered += 1;
            if !should_continue {
                info!(middleware = %mw_name, "step: middleware before returned false, turn stopped");
                handled = false;
                break;
            }
        }

        if handled {
            handler.on_turn(&ctx, cancel).await?;
            debug!(responded = ctx.responded(), "step: handler done");
        }

        for mw in self.middleware[..entered].iter().rev() {
            let mw_name = std::any::type_name_of_val(mw.as_ref());
            debug!(middleware = %mw_name, "step: middleware after");
            mw.after(&ctx, handled).await?;
        }

        info!(
            user_id = %activity.from.id,
            conversation_id = %activity.conversation.id,
            handled,
            "step: turn finished"
        );

        Ok(handled)
    }
}

// Integration tests live in tests/bot_adapter_test.rs

use crate::dialog::{Dialog, DialogState, DialogTurnResult};
use crate::dialog_context::DialogContext;
use crate::prompt::PromptOptions;
use async_trait::async_trait;
use bot_core::{Result, TurnContext};
use bot_state::StatePropertyAccessor;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::instrument;

/// Runs the dialog stack of the current conversation: resume, start a prompt, cancel.
#[async_trait]
pub trait DialogRunner: Send + Sync {
    /// Resumes the active dialog, if any.
    async fn continue_dialog(&self, ctx: &TurnContext) -> Result<DialogTurnResult>;
    /// Starts prompt `dialog_id` and sends its first prompt.
    async fn prompt(
        &self,
        ctx: &TurnContext,
        dialog_id: &str,
        options: PromptOptions,
    ) -> Result<DialogTurnResult>;
    /// Drops every dialog on the stack.
    async fn cancel_all(&self, ctx: &TurnContext) -> Result<DialogTurnResult>;
}

/// Registered dialogs plus the accessor where the stack is persisted.
pub struct DialogSet {
    dialogs: HashMap<String, Arc<dyn Dialog>>,
    state: StatePropertyAccessor<DialogState>,
}

impl DialogSet {
    pub fn new(state: StatePropertyAccessor<DialogState>) -> Self {
        Self {
            dialogs: HashMap::new(),
            state,
        }
    }

    /// Registers a dialog under its id; a later dialog with the same id replaces it.
    pub fn add(mut self, dialog: Arc<dyn Dialog>) -> Self {
        self.dialogs.insert(dialog.id().to_string(), dialog);
        self
    }

    pub fn find(&self, id: &str) -> Option<Arc<dyn Dialog>> {
        self.dialogs.get(id).cloned()
    }

    /// Loads the stack for this conversation.
    pub async fn create_context<'a>(&'a self, ctx: &'a TurnContext) -> Result<DialogContext<'a>> {
        let state = self.state.get_or_default(ctx).await?;
        Ok(DialogContext::new(ctx, &self.dialogs, state))
    }

    /// Writes the stack back into conversation state (persisted by its `save_changes`).
    pub async fn save_context(&self, dc: DialogContext<'_>) -> Result<()> {
        let ctx = dc.context();
        self.state.set(ctx, &dc.into_state()).await
    }
}

#[async_trait]
impl DialogRunner for DialogSet {
    #[instrument(skip(self, ctx))]
    async fn continue_dialog(&self, ctx: &TurnContext) -> Result<DialogTurnResult> {
        let mut dc = self.create_context(ctx).await?;
        let result = dc.continue_dialog().await?;
        self.save_context(dc).await?;
        Ok(result)
    }

    #[instrument(skip(self, ctx, options))]
    async fn prompt(
        &self,
        ctx: &TurnContext,
        dialog_id: &str,
        options: PromptOptions,
    ) -> Result<DialogTurnResult> {
        let mut dc = self.create_context(ctx).await?;
        let result = dc.prompt(dialog_id, options).await?;
        self.save_context(dc).await?;
        Ok(result)
    }

    #[instrument(skip(self, ctx))]
    async fn cancel_all(&self, ctx: &TurnContext) -> Result<DialogTurnResult> {
        let mut dc = self.create_context(ctx).await?;
        let result = dc.cancel_all_dialogs();
        self.save_context(dc).await?;
        Ok(result)
    }
}

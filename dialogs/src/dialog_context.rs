use crate::dialog::{Dialog, DialogInstance, DialogState, DialogTurnResult, DialogTurnStatus};
use crate::error::DialogError;
use crate::prompt::PromptOptions;
use bot_core::{Result, TurnContext};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Runs dialogs against the stack of one conversation for one turn.
pub struct DialogContext<'a> {
    turn: &'a TurnContext,
    dialogs: &'a HashMap<String, Arc<dyn Dialog>>,
    state: DialogState,
}

impl<'a> DialogContext<'a> {
    pub fn new(
        turn: &'a TurnContext,
        dialogs: &'a HashMap<String, Arc<dyn Dialog>>,
        state: DialogState,
    ) -> Self {
        Self {
            turn,
            dialogs,
            state,
        }
    }

    pub fn context(&self) -> &'a TurnContext {
        self.turn
    }

    pub fn state(&self) -> &DialogState {
        &self.state
    }

    pub fn into_state(self) -> DialogState {
        self.state
    }

    pub fn active_dialog(&self) -> Option<&DialogInstance> {
        self.state.dialog_stack.last()
    }

    pub fn active_dialog_mut(&mut self) -> Option<&mut DialogInstance> {
        self.state.dialog_stack.last_mut()
    }

    fn find(&self, id: &str) -> Result<Arc<dyn Dialog>> {
        self.dialogs
            .get(id)
            .cloned()
            .ok_or_else(|| DialogError::UnknownDialog(id.to_string()).into())
    }

    /// Pushes dialog `id` and starts it.
    pub async fn begin_dialog(
        &mut self,
        id: &str,
        options: Option<Value>,
    ) -> Result<DialogTurnResult> {
        let dialog = self.find(id)?;
        debug!(dialog_id = %id, depth = self.state.dialog_stack.len(), "Begin dialog");
        self.state.dialog_stack.push(DialogInstance {
            id: id.to_string(),
            state: Default::default(),
        });
        dialog.begin_dialog(self, options).await
    }

    /// Starts prompt `id` with the given prompt texts.
    pub async fn prompt(&mut self, id: &str, options: PromptOptions) -> Result<DialogTurnResult> {
        let options = serde_json::to_value(options)?;
        self.begin_dialog(id, Some(options)).await
    }

    /// Forwards the current activity to the dialog on top of the stack.
    pub async fn continue_dialog(&mut self) -> Result<DialogTurnResult> {
        let Some(active) = self.active_dialog() else {
            return Ok(DialogTurnResult::empty());
        };
        let dialog = self.find(&active.id)?;
        dialog.continue_dialog(self).await
    }

    /// Pops the active dialog. The parent, if any, is resumed with `result`.
    pub async fn end_dialog(&mut self, result: Option<Value>) -> Result<DialogTurnResult> {
        if let Some(ended) = self.state.dialog_stack.pop() {
            debug!(dialog_id = %ended.id, "End dialog");
        }
        match self.active_dialog() {
            Some(parent) => {
                let dialog = self.find(&parent.id)?;
                dialog.resume_dialog(self, result).await
            }
            None => Ok(DialogTurnResult::complete(result)),
        }
    }

    /// Empties the stack.
    pub fn cancel_all_dialogs(&mut self) -> DialogTurnResult {
        if self.state.dialog_stack.is_empty() {
            return DialogTurnResult::empty();
        }
        self.state.dialog_stack.clear();
        DialogTurnResult::new(DialogTurnStatus::Cancelled)
    }
}

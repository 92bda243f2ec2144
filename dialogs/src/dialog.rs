//! Dialog trait and the persisted dialog stack.

use crate::dialog_context::DialogContext;
use async_trait::async_trait;
use bot_core::Result;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Outcome of running the dialog stack for one turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DialogTurnStatus {
    /// No dialog was active.
    Empty,
    /// A dialog is active and waits for the next message.
    Waiting,
    /// The last dialog on the stack ended; `result` holds its value.
    Complete,
    /// The stack was cancelled.
    Cancelled,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DialogTurnResult {
    pub status: DialogTurnStatus,
    pub result: Option<Value>,
}

impl DialogTurnResult {
    pub fn new(status: DialogTurnStatus) -> Self {
        Self {
            status,
            result: None,
        }
    }

    pub fn empty() -> Self {
        Self::new(DialogTurnStatus::Empty)
    }

    pub fn waiting() -> Self {
        Self::new(DialogTurnStatus::Waiting)
    }

    pub fn complete(result: Option<Value>) -> Self {
        Self {
            status: DialogTurnStatus::Complete,
            result,
        }
    }

    /// The result as a string, if the dialog produced one.
    pub fn result_str(&self) -> Option<&str> {
        self.result.as_ref().and_then(Value::as_str)
    }
}

/// One running dialog and its private state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DialogInstance {
    pub id: String,
    pub state: Map<String, Value>,
}

/// The dialog stack, stored as a conversation-state property. Top of stack is the last entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DialogState {
    pub dialog_stack: Vec<DialogInstance>,
}

#[async_trait]
pub trait Dialog: Send + Sync {
    fn id(&self) -> &str;

    /// Called when the dialog is pushed onto the stack.
    async fn begin_dialog(
        &self,
        dc: &mut DialogContext<'_>,
        options: Option<Value>,
    ) -> Result<DialogTurnResult>;

    /// Called for each turn while the dialog is on top. Default: end immediately.
    async fn continue_dialog(&self, dc: &mut DialogContext<'_>) -> Result<DialogTurnResult> {
        dc.end_dialog(None).await
    }

    /// Called when a child dialog ended and this one is on top again. Default: pass the result up.
    async fn resume_dialog(
        &self,
        dc: &mut DialogContext<'_>,
        result: Option<Value>,
    ) -> Result<DialogTurnResult> {
        dc.end_dialog(result).await
    }
}

//! # dialogs
//!
//! Minimal dialog stack on top of bot-state: [`DialogSet`] keeps registered dialogs and persists the
//! stack in conversation state; [`TextPrompt`] asks for text and re-prompts until its validator accepts.
//! [`DialogRunner`] is the seam handlers depend on.

mod dialog;
mod dialog_context;
mod dialog_set;
mod error;
mod prompt;

pub use dialog::{Dialog, DialogInstance, DialogState, DialogTurnResult, DialogTurnStatus};
pub use dialog_context::DialogContext;
pub use dialog_set::{DialogRunner, DialogSet};
pub use error::DialogError;
pub use prompt::{
    PromptOptions, PromptRecognizerResult, PromptValidator, PromptValidatorContext, TextPrompt,
};

use bot_core::BotError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DialogError {
    #[error("Unknown dialog: {0}")]
    UnknownDialog(String),

    #[error("Invalid dialog state: {0}")]
    InvalidState(String),
}

impl From<DialogError> for BotError {
    fn from(e: DialogError) -> Self {
        BotError::Dialog(e.to_string())
    }
}

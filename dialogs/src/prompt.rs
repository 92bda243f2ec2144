//! Text prompt: asks a question, validates the answer, re-asks until it is accepted.

use crate::dialog::{Dialog, DialogTurnResult};
use crate::dialog_context::DialogContext;
use crate::error::DialogError;
use async_trait::async_trait;
use bot_core::{ActivityType, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};

const OPTIONS_KEY: &str = "options";
const ATTEMPT_COUNT_KEY: &str = "attemptCount";

/// Texts shown by a prompt. `retry_prompt` falls back to `prompt` when absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PromptOptions {
    pub prompt: Option<String>,
    pub retry_prompt: Option<String>,
}

/// What the prompt recognized from the user's message.
#[derive(Debug, Clone, PartialEq)]
pub struct PromptRecognizerResult<T> {
    pub succeeded: bool,
    pub value: Option<T>,
}

/// Input to a validator. The validator may rewrite `recognized.value`.
#[derive(Debug, Clone)]
pub struct PromptValidatorContext<T> {
    pub recognized: PromptRecognizerResult<T>,
    /// 1 on the first answer.
    pub attempt_count: u32,
}

/// Attempts recorded so far; out-of-range values saturate at `u32::MAX`.
fn stored_attempt_count(value: Option<&Value>) -> u32 {
    value
        .and_then(Value::as_u64)
        .map(|count| u32::try_from(count).unwrap_or(u32::MAX))
        .unwrap_or(0)
}

pub type PromptValidator<T> = Arc<dyn Fn(&mut PromptValidatorContext<T>) -> bool + Send + Sync>;

pub struct TextPrompt {
    id: String,
    validator: Option<PromptValidator<String>>,
}

impl TextPrompt {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            validator: None,
        }
    }

    pub fn with_validator<F>(mut self, validator: F) -> Self
    where
        F: Fn(&mut PromptValidatorContext<String>) -> bool + Send + Sync + 'static,
    {
        self.validator = Some(Arc::new(validator));
        self
    }

    fn recognize(text: Option<&str>) -> PromptRecognizerResult<String> {
        PromptRecognizerResult {
            succeeded: text.is_some(),
            value: text.map(str::to_string),
        }
    }

    async fn send_prompt(
        dc: &DialogContext<'_>,
        options: &PromptOptions,
        is_retry: bool,
    ) -> Result<()> {
        let text = if is_retry {
            options.retry_prompt.as_ref().or(options.prompt.as_ref())
        } else {
            options.prompt.as_ref()
        };
        if let Some(text) = text {
            dc.context().send_activity(text).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl Dialog for TextPrompt {
    fn id(&self) -> &str {
        &self.id
    }

    async fn begin_dialog(
        &self,
        dc: &mut DialogContext<'_>,
        options: Option<Value>,
    ) -> Result<DialogTurnResult> {
        let options: PromptOptions = match options {
            Some(value) => serde_json::from_value(value)?,
            None => PromptOptions::default(),
        };

        let instance = dc
            .active_dialog_mut()
            .ok_or_else(|| DialogError::InvalidState("prompt began without an instance".into()))?;
        instance
            .state
            .insert(OPTIONS_KEY.to_string(), serde_json::to_value(&options)?);
        instance
            .state
            .insert(ATTEMPT_COUNT_KEY.to_string(), Value::from(0_u32));

        Self::send_prompt(dc, &options, false).await?;
        Ok(DialogTurnResult::waiting())
    }

    async fn continue_dialog(&self, dc: &mut DialogContext<'_>) -> Result<DialogTurnResult> {
        let activity = dc.context().activity();
        if activity.activity_type != ActivityType::Message {
            return Ok(DialogTurnResult::waiting());
        }

        let instance = dc
            .active_dialog_mut()
            .ok_or_else(|| DialogError::InvalidState("no active prompt".into()))?;
        let options: PromptOptions = match instance.state.get(OPTIONS_KEY) {
            Some(value) => serde_json::from_value(value.clone())?,
            None => PromptOptions::default(),
        };
        let attempt_count = stored_attempt_count(instance.state.get(ATTEMPT_COUNT_KEY))
            .saturating_add(1);
        instance
            .state
            .insert(ATTEMPT_COUNT_KEY.to_string(), Value::from(attempt_count));

        let recognized = Self::recognize(activity.text.as_deref());
        let (is_valid, value) = match &self.validator {
            Some(validator) => {
                let mut validation = PromptValidatorContext {
                    recognized,
                    attempt_count,
                };
                let is_valid = validator(&mut validation);
                (is_valid, validation.recognized.value)
            }
            None => (recognized.succeeded, recognized.value),
        };

        if is_valid {
            info!(dialog_id = %self.id, attempt_count, "Prompt accepted");
            return dc.end_dialog(value.map(Value::String)).await;
        }

        debug!(dialog_id = %self.id, attempt_count, "Prompt rejected, re-prompting");
        if !dc.context().responded() {
            Self::send_prompt(dc, &options, true).await?;
        }
        Ok(DialogTurnResult::waiting())
    }
}

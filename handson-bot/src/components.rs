//! Wiring: storage backend, state scopes, dialog set, and the sample bot built on them.

use crate::config::{BotConfig, StateStoreKind};
use crate::profile::UserProfile;
use crate::sample_bot::{SampleBot, NAME_PROMPT_ID};
use crate::validator::validate_handle_name;
use anyhow::{Context, Result};
use bot_state::{BotState, MemoryStorage, SqliteStorage, StatePropertyAccessor, Storage};
use dialogs::{DialogSet, DialogState, TextPrompt};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Property names inside conversation and user state.
pub const DIALOG_STATE_PROPERTY: &str = "DialogState";
pub const USER_PROFILE_PROPERTY: &str = "UserProfile";

/// Opens the configured state store.
pub async fn create_storage(config: &BotConfig) -> Result<Arc<dyn Storage>> {
    info!(state_store = %config.state_store, "Creating state storage");
    match config.state_store {
        StateStoreKind::Memory => Ok(Arc::new(MemoryStorage::new())),
        StateStoreKind::Sqlite => {
            let url = config.state_database_url.as_str();
            if !url.starts_with("sqlite:") {
                if let Some(parent) = Path::new(url).parent() {
                    if !parent.as_os_str().is_empty() {
                        std::fs::create_dir_all(parent).with_context(|| {
                            format!("Create state database directory {}", parent.display())
                        })?;
                    }
                }
            }
            let storage = SqliteStorage::new(url)
                .await
                .with_context(|| format!("Open state database {}", url))?;
            Ok(Arc::new(storage))
        }
    }
}

/// State scopes, accessors and dialogs shared by every turn.
#[derive(Clone)]
pub struct BotComponents {
    pub conversation_state: Arc<BotState>,
    pub user_state: Arc<BotState>,
    pub dialogs: Arc<DialogSet>,
    pub profiles: StatePropertyAccessor<UserProfile>,
}

pub fn build_bot_components(storage: Arc<dyn Storage>) -> BotComponents {
    let conversation_state = Arc::new(BotState::conversation(Arc::clone(&storage)));
    let user_state = Arc::new(BotState::user(storage));

    let dialogs = DialogSet::new(
        conversation_state.create_property::<DialogState>(DIALOG_STATE_PROPERTY),
    )
    .add(Arc::new(
        TextPrompt::new(NAME_PROMPT_ID).with_validator(validate_handle_name),
    ));

    BotComponents {
        profiles: user_state.create_property::<UserProfile>(USER_PROFILE_PROPERTY),
        conversation_state,
        user_state,
        dialogs: Arc::new(dialogs),
    }
}

pub fn build_sample_bot(components: &BotComponents) -> SampleBot {
    SampleBot::new(
        components.conversation_state.clone(),
        components.user_state.clone(),
        components.dialogs.clone(),
        Arc::new(components.profiles.clone()),
    )
}

use serde::{Deserialize, Serialize};

/// Per-user record kept in user state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Set once the handle-name prompt completes; always upper-case and at least 3 characters.
    pub handle_name: Option<String>,
}

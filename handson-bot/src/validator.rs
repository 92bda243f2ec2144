//! Handle-name validation used by the name prompt.

use dialogs::PromptValidatorContext;

pub const MIN_HANDLE_NAME_LEN: usize = 3;

/// Returns the canonical (upper-cased) handle name, or `None` when the candidate is absent or
/// shorter than [`MIN_HANDLE_NAME_LEN`] characters.
pub fn canonicalize_handle_name(candidate: Option<&str>) -> Option<String> {
    candidate
        .filter(|text| text.chars().count() >= MIN_HANDLE_NAME_LEN)
        .map(str::to_uppercase)
}

/// Prompt validator: accepts valid names and rewrites the recognized value to its canonical form.
pub fn validate_handle_name(ctx: &mut PromptValidatorContext<String>) -> bool {
    match canonicalize_handle_name(ctx.recognized.value.as_deref()) {
        Some(name) => {
            ctx.recognized.value = Some(name);
            true
        }
        None => false,
    }
}

//! Event-tag and user-handle normalization.

use crate::error::CoreError;

/// Maximum length of an event tag, marker included.
pub const MAX_TAG_LEN: usize = 60;

/// Handle length limits (marker not stored).
pub const MIN_HANDLE_LEN: usize = 3;
pub const MAX_HANDLE_LEN: usize = 30;

/// Normalize an event tag to its canonical leading-`#` form.
///
/// Strips surrounding whitespace and any existing leading `#` markers, then
/// prepends exactly one. Empty tags and tags with interior whitespace are
/// rejected -- the tag doubles as a search token.
pub fn normalize_tag(raw: &str) -> Result<String, CoreError> {
    let stripped = raw.trim().trim_start_matches('#');

    if stripped.is_empty() {
        return Err(CoreError::Validation("Event tag is required".into()));
    }
    if stripped.chars().any(char::is_whitespace) {
        return Err(CoreError::Validation(
            "Event tag must not contain whitespace".into(),
        ));
    }

    let tag = format!("#{stripped}");
    if tag.len() > MAX_TAG_LEN {
        return Err(CoreError::Validation(format!(
            "Event tag must be at most {MAX_TAG_LEN} characters"
        )));
    }
    Ok(tag)
}

/// Validate a user-chosen handle.
///
/// Handles are lowercase alphanumeric plus `.`, `_`, and `-`, between
/// [`MIN_HANDLE_LEN`] and [`MAX_HANDLE_LEN`] characters.
pub fn validate_handle(handle: &str) -> Result<(), CoreError> {
    if handle.len() < MIN_HANDLE_LEN || handle.len() > MAX_HANDLE_LEN {
        return Err(CoreError::Validation(format!(
            "Handle must be between {MIN_HANDLE_LEN} and {MAX_HANDLE_LEN} characters"
        )));
    }
    let valid = handle
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '.' | '_' | '-'));
    if !valid {
        return Err(CoreError::Validation(
            "Handle may only contain lowercase letters, digits, '.', '_' and '-'".into(),
        ));
    }
    Ok(())
}

/// Derive a default handle from an email address.
///
/// Takes the local part, lowercases it, and drops anything outside the
/// handle alphabet. Short results are padded with `"user"` so the derived
/// handle always validates; uniqueness is the caller's problem.
pub fn derive_handle(email: &str) -> String {
    let local = email.split('@').next().unwrap_or(email);
    let mut handle: String = local
        .to_ascii_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '.' | '_' | '-'))
        .collect();

    if handle.len() < MIN_HANDLE_LEN {
        handle.insert_str(0, "user");
    }
    handle.truncate(MAX_HANDLE_LEN);
    handle
}

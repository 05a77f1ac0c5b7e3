//! Search & discovery helpers.
//!
//! Search runs prefix-range queries against user handles, event tags, and
//! location names. Suggestions are a tagged union rather than a
//! loosely-typed object discriminated by a string field at each use site.

use serde::{Deserialize, Serialize};

use crate::types::DbId;

/// Default number of full search results.
pub const DEFAULT_SEARCH_LIMIT: i64 = 20;

/// Maximum number of full search results.
pub const MAX_SEARCH_LIMIT: i64 = 50;

/// Number of typeahead suggestions returned by the suggest endpoint.
pub const SUGGEST_LIMIT: i64 = 8;

/// A single search suggestion.
///
/// Serialized with a `kind` discriminant (`"user"` / `"event"`); each case
/// carries its own required fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Suggestion {
    User {
        id: DbId,
        handle: String,
        display_name: String,
        image_data: Option<String>,
    },
    Event {
        id: DbId,
        tag: String,
        location_name: String,
        image_data: Option<String>,
    },
}

/// Normalize a raw search query into a prefix term.
///
/// Trims whitespace and drops a leading `#` or `@` sigil so "#Con" matches
/// the stored tag "#Concert" by its bare prefix. Returns `None` when
/// nothing searchable remains.
pub fn normalize_prefix(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let stripped = trimmed
        .strip_prefix('#')
        .or_else(|| trimmed.strip_prefix('@'))
        .unwrap_or(trimmed);

    if stripped.is_empty() {
        None
    } else {
        Some(stripped.to_string())
    }
}

/// Escape LIKE metacharacters in a prefix term.
///
/// The repository appends `%` itself; user input must not smuggle in
/// wildcards or a trailing escape.
pub fn escape_like(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

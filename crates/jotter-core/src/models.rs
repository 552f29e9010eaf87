//! Core data models for jotter.
//!
//! These types are shared across all jotter crates and represent
//! the core domain entities.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// NOTE TYPES
// =============================================================================

/// Bodies at or under this many characters are shown in full in summaries.
pub const SUMMARY_MAX_CHARS: usize = 75;

/// Number of leading characters kept when a body is shortened for a summary.
pub const SUMMARY_KEEP_CHARS: usize = 70;

/// Marker appended to a shortened summary.
pub const SUMMARY_ELLIPSIS: &str = " ...";

/// A stored note.
///
/// `id` is assigned by the store on insert and never changes afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: Uuid,
    pub title: Option<String>,
    pub body: Option<String>,
}

impl Note {
    /// Body shortened for list display, see [`truncate`].
    pub fn summary(&self) -> String {
        self.body.as_deref().map(truncate).unwrap_or_default()
    }
}

/// Shorten a note body for summary display.
///
/// Bodies of at most 75 characters are returned unchanged. Longer bodies keep
/// their first 70 characters followed by `" ..."`. Lengths count Unicode
/// scalar values, not bytes.
pub fn truncate(body: &str) -> String {
    if body.chars().count() <= SUMMARY_MAX_CHARS {
        return body.to_string();
    }
    let mut short: String = body.chars().take(SUMMARY_KEEP_CHARS).collect();
    short.push_str(SUMMARY_ELLIPSIS);
    short
}

// =============================================================================
// VISIT TYPES
// =============================================================================

/// One logged GET request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Visit {
    pub id: Uuid,
    pub path: String,
    pub date: DateTime<Utc>,
    pub user_agent: Option<String>,
}

/// Number of visits recorded for one request path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageViews {
    pub path: String,
    pub count: i64,
}

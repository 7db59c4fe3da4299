//! Saved bounty/project references.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What a bookmark points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookmarkKind {
    Bounty,
    Project,
}

impl BookmarkKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookmarkKind::Bounty => "bounty",
            BookmarkKind::Project => "project",
        }
    }
}

impl fmt::Display for BookmarkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not a known bookmark kind.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown bookmark type '{0}' (expected 'bounty' or 'project')")]
pub struct ParseBookmarkKindError(pub String);

impl FromStr for BookmarkKind {
    type Err = ParseBookmarkKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bounty" | "bounties" => Ok(BookmarkKind::Bounty),
            "project" | "projects" => Ok(BookmarkKind::Project),
            _ => Err(ParseBookmarkKindError(s.to_string())),
        }
    }
}

/// One saved reference. `(id, kind)` is unique within a bookmark set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkItem {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: BookmarkKind,
    pub saved_at: DateTime<Utc>,
}

impl BookmarkItem {
    /// Create a bookmark stamped with the current time.
    pub fn new(id: impl Into<String>, kind: BookmarkKind) -> Self {
        Self {
            id: id.into(),
            kind,
            saved_at: Utc::now(),
        }
    }

    pub fn matches(&self, id: &str, kind: BookmarkKind) -> bool {
        self.kind == kind && self.id == id
    }
}

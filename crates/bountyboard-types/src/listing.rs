//! Bounty and project listings as returned by the backend.

use serde::{Deserialize, Serialize};

use crate::bookmark::BookmarkKind;

/// A bounty. Fields beyond the ones the client core reads are kept in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bounty {
    #[serde(alias = "_id")]
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reward: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// A freelance project listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(alias = "_id")]
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget: Option<f64>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// A bookmarked listing resolved to its full object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "item", rename_all = "lowercase")]
pub enum Listing {
    Bounty(Bounty),
    Project(Project),
}

impl Listing {
    pub fn id(&self) -> &str {
        match self {
            Listing::Bounty(b) => &b.id,
            Listing::Project(p) => &p.id,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Listing::Bounty(b) => &b.title,
            Listing::Project(p) => &p.title,
        }
    }

    pub fn kind(&self) -> BookmarkKind {
        match self {
            Listing::Bounty(_) => BookmarkKind::Bounty,
            Listing::Project(_) => BookmarkKind::Project,
        }
    }
}

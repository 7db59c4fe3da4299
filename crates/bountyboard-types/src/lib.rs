//! Shared domain types for the bountyboard client core.
//!
//! Wire shapes use camelCase to match the backend and the persisted
//! records written by the web front end.

pub mod bookmark;
pub mod defaults;
pub mod listing;
pub mod session;
pub mod winner;

pub use bookmark::{BookmarkItem, BookmarkKind, ParseBookmarkKindError};
pub use listing::{Bounty, Listing, Project};
pub use session::{Session, UserSummary};
pub use winner::{WinnerDraft, WinnerPatch};

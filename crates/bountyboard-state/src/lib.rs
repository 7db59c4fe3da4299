//! Locally persisted client state.
//!
//! Two independent features live here, both stored through a
//! [`KeyValueStore`](bountyboard_storage::KeyValueStore):
//!
//! - [`BookmarkManager`] - "save for later" set of bounties and projects.
//!   Every change is persisted and announced on a [`ChangeBus`] so other
//!   managers over the same storage can [`reload`](BookmarkManager::reload).
//! - [`WinnerDraftManager`] - per-bounty ranking of winners staged before
//!   submission. At most one draft per position and per user, always sorted
//!   by position.
//!
//! Storage failures are logged and never returned to the caller. A bookmark
//! write that fails also raises an error notice.

mod bookmarks;
mod error;
mod events;
mod notify;
mod winners;

pub use bookmarks::{
    BOOKMARK_ADDED, BOOKMARK_REMOVED, BOOKMARK_SAVE_FAILED, BookmarkManager, DEFAULT_BOOKMARKS_KEY,
};
pub use error::{Result, StateError};
pub use events::{BookmarksChanged, ChangeBus};
pub use notify::{Notice, NoticeLevel, Notifier, RecordingNotifier, TracingNotifier};
pub use winners::{DEFAULT_WINNERS_PREFIX, WinnerDraftManager};

//! Bookmark manager.

use std::collections::HashSet;
use std::sync::Arc;

use bountyboard_storage::{SharedStore, load_json, save_json};
use bountyboard_types::{BookmarkItem, BookmarkKind};
use tokio::sync::broadcast;

use crate::events::{BookmarksChanged, ChangeBus};
use crate::notify::{Notifier, TracingNotifier};

/// Default storage key for the bookmark set.
pub use bountyboard_types::defaults::BOOKMARKS_KEY as DEFAULT_BOOKMARKS_KEY;

/// Notice shown after a bookmark is added.
pub const BOOKMARK_ADDED: &str = "Added to bookmarks";

/// Notice shown after a bookmark is removed.
pub const BOOKMARK_REMOVED: &str = "Removed from bookmarks";

/// Notice shown when the bookmark set could not be written.
pub const BOOKMARK_SAVE_FAILED: &str = "Could not save bookmarks";

/// Client-local set of saved bounties and projects.
///
/// The whole set is written as one JSON array after every change, then a
/// [`BookmarksChanged`] event goes out on the bus. Managers sharing the same
/// storage and bus stay in sync by calling [`reload`](Self::reload) when they
/// receive it. Concurrent writers are not locked against each other; the
/// last write wins.
pub struct BookmarkManager {
    store: SharedStore,
    key: String,
    items: Vec<BookmarkItem>,
    bus: ChangeBus,
    notifier: Arc<dyn Notifier>,
}

impl std::fmt::Debug for BookmarkManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BookmarkManager")
            .field("key", &self.key)
            .field("items", &self.items.len())
            .finish()
    }
}

impl BookmarkManager {
    /// Open the bookmark set stored under [`DEFAULT_BOOKMARKS_KEY`].
    pub fn new(store: SharedStore) -> Self {
        Self::with_key(store, DEFAULT_BOOKMARKS_KEY)
    }

    /// Open the bookmark set stored under `key`.
    pub fn with_key(store: SharedStore, key: impl Into<String>) -> Self {
        let key = key.into();
        let items = load_items(&store, &key);
        Self {
            store,
            key,
            items,
            bus: ChangeBus::new(),
            notifier: Arc::new(TracingNotifier),
        }
    }

    /// Publish changes on (and listen to) a shared bus.
    pub fn with_bus(mut self, bus: ChangeBus) -> Self {
        self.bus = bus;
        self
    }

    /// Send add/remove and save-failure notices to `notifier`.
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn is_bookmarked(&self, id: &str, kind: BookmarkKind) -> bool {
        self.items.iter().any(|item| item.matches(id, kind))
    }

    /// Add the bookmark if absent, remove it if present.
    ///
    /// Returns whether `(id, kind)` is bookmarked afterwards.
    pub fn toggle_bookmark(&mut self, id: &str, kind: BookmarkKind) -> bool {
        let now_bookmarked = match self.items.iter().position(|item| item.matches(id, kind)) {
            Some(index) => {
                self.items.remove(index);
                self.notifier.success(BOOKMARK_REMOVED);
                false
            }
            None => {
                self.items.push(BookmarkItem::new(id, kind));
                self.notifier.success(BOOKMARK_ADDED);
                true
            }
        };

        tracing::debug!(id, kind = %kind, now_bookmarked, "bookmark toggled");
        self.persist_and_publish();
        now_bookmarked
    }

    /// Remove every bookmark.
    pub fn clear(&mut self) {
        if self.items.is_empty() {
            return;
        }
        self.items.clear();
        self.persist_and_publish();
    }

    /// Re-read the set from storage, picking up other managers' writes.
    pub fn reload(&mut self) {
        self.items = load_items(&self.store, &self.key);
    }

    /// All bookmarks, oldest first.
    pub fn items(&self) -> &[BookmarkItem] {
        &self.items
    }

    pub fn items_of(&self, kind: BookmarkKind) -> impl Iterator<Item = &BookmarkItem> {
        self.items.iter().filter(move |item| item.kind == kind)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn bus(&self) -> &ChangeBus {
        &self.bus
    }

    /// Receive an event after every change made through this bus.
    pub fn subscribe(&self) -> broadcast::Receiver<BookmarksChanged> {
        self.bus.subscribe()
    }

    fn persist_and_publish(&self) {
        if let Err(e) = save_json(self.store.as_ref(), &self.key, &self.items) {
            tracing::warn!(key = %self.key, error = %e, "failed to persist bookmarks");
            self.notifier.error(BOOKMARK_SAVE_FAILED);
        }
        self.bus.publish();
    }
}

/// Load the stored set, dropping repeated `(id, kind)` pairs.
fn load_items(store: &SharedStore, key: &str) -> Vec<BookmarkItem> {
    let items: Vec<BookmarkItem> = load_json(store.as_ref(), key).unwrap_or_default();
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert((item.id.clone(), item.kind)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bountyboard_storage::{KeyValueStore, MemoryStore, StorageError};
    use chrono::{TimeZone, Utc};

    use crate::NoticeLevel;

    /// Reads as empty, refuses every write.
    struct ReadOnlyStore;

    impl KeyValueStore for ReadOnlyStore {
        fn get(&self, _key: &str) -> bountyboard_storage::Result<Option<String>> {
            Ok(None)
        }

        fn set(&self, key: &str, _value: &str) -> bountyboard_storage::Result<()> {
            Err(StorageError::Io {
                key: key.to_string(),
                source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
            })
        }

        fn remove(&self, _key: &str) -> bountyboard_storage::Result<()> {
            Ok(())
        }
    }

    fn manager_over(store: &MemoryStore) -> (BookmarkManager, Arc<crate::RecordingNotifier>) {
        let notifier = Arc::new(crate::RecordingNotifier::new());
        let manager =
            BookmarkManager::new(Arc::new(store.clone())).with_notifier(notifier.clone());
        (manager, notifier)
    }

    #[test]
    fn test_toggle_adds_then_removes() {
        let store = MemoryStore::new();
        let (mut manager, notifier) = manager_over(&store);

        assert!(!manager.is_bookmarked("b1", BookmarkKind::Bounty));
        assert!(manager.toggle_bookmark("b1", BookmarkKind::Bounty));
        assert!(manager.is_bookmarked("b1", BookmarkKind::Bounty));
        assert!(!manager.toggle_bookmark("b1", BookmarkKind::Bounty));
        assert!(!manager.is_bookmarked("b1", BookmarkKind::Bounty));

        assert_eq!(notifier.messages(), vec![BOOKMARK_ADDED, BOOKMARK_REMOVED]);
    }

    #[test]
    fn test_double_toggle_restores_original_set() {
        let store = MemoryStore::new();
        let (mut manager, _) = manager_over(&store);
        manager.toggle_bookmark("p1", BookmarkKind::Project);
        let before = manager.items().to_vec();

        manager.toggle_bookmark("b9", BookmarkKind::Bounty);
        manager.toggle_bookmark("b9", BookmarkKind::Bounty);
        assert_eq!(manager.items(), before.as_slice());
    }

    #[test]
    fn test_same_id_different_kind_are_distinct() {
        let store = MemoryStore::new();
        let (mut manager, _) = manager_over(&store);
        manager.toggle_bookmark("x", BookmarkKind::Bounty);
        manager.toggle_bookmark("x", BookmarkKind::Project);

        assert_eq!(manager.len(), 2);
        assert_eq!(manager.items_of(BookmarkKind::Project).count(), 1);
    }

    #[test]
    fn test_stored_bookmark_toggle_scenario() {
        let store = MemoryStore::new();
        store
            .set(
                DEFAULT_BOOKMARKS_KEY,
                r#"[{"id":"b1","type":"bounty","savedAt":"2024-01-01T00:00:00Z"}]"#,
            )
            .unwrap();
        let t1 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();

        let (mut manager, notifier) = manager_over(&store);
        assert_eq!(manager.items()[0].saved_at, t1);

        manager.toggle_bookmark("b1", BookmarkKind::Bounty);
        assert!(manager.is_empty());
        assert_eq!(notifier.messages(), vec![BOOKMARK_REMOVED]);
        assert_eq!(store.get(DEFAULT_BOOKMARKS_KEY).unwrap().as_deref(), Some("[]"));

        manager.toggle_bookmark("b1", BookmarkKind::Bounty);
        assert_eq!(manager.len(), 1);
        assert!(manager.items()[0].saved_at > t1);
    }

    #[test]
    fn test_corrupt_storage_falls_back_to_empty() {
        let store = MemoryStore::new();
        store.set(DEFAULT_BOOKMARKS_KEY, "not json at all").unwrap();
        let (mut manager, _) = manager_over(&store);
        assert!(manager.is_empty());

        // Still usable, and the next write replaces the bad data.
        manager.toggle_bookmark("b1", BookmarkKind::Bounty);
        let reopened = BookmarkManager::new(Arc::new(store.clone()));
        assert!(reopened.is_bookmarked("b1", BookmarkKind::Bounty));
    }

    #[test]
    fn test_load_drops_duplicates() {
        let store = MemoryStore::new();
        store
            .set(
                DEFAULT_BOOKMARKS_KEY,
                r#"[
                    {"id":"b1","type":"bounty","savedAt":"2024-01-01T00:00:00Z"},
                    {"id":"b1","type":"bounty","savedAt":"2024-02-01T00:00:00Z"}
                ]"#,
            )
            .unwrap();
        let (manager, _) = manager_over(&store);
        assert_eq!(manager.len(), 1);
    }

    #[tokio::test]
    async fn test_other_manager_resyncs_on_event() {
        let store = MemoryStore::new();
        let bus = ChangeBus::new();
        let mut tab_a = BookmarkManager::new(Arc::new(store.clone())).with_bus(bus.clone());
        let mut tab_b = BookmarkManager::new(Arc::new(store.clone())).with_bus(bus.clone());
        let mut events = tab_b.subscribe();

        tab_a.toggle_bookmark("p7", BookmarkKind::Project);
        assert!(!tab_b.is_bookmarked("p7", BookmarkKind::Project));

        events.recv().await.unwrap();
        tab_b.reload();
        assert!(tab_b.is_bookmarked("p7", BookmarkKind::Project));
    }

    #[test]
    fn test_clear_persists_empty_set() {
        let store = MemoryStore::new();
        let (mut manager, _) = manager_over(&store);
        manager.toggle_bookmark("b1", BookmarkKind::Bounty);
        manager.toggle_bookmark("p1", BookmarkKind::Project);
        manager.clear();

        assert!(manager.is_empty());
        let reopened = BookmarkManager::new(Arc::new(store));
        assert!(reopened.is_empty());
    }

    #[tokio::test]
    async fn test_failed_save_reports_error_and_keeps_state() {
        let notifier = Arc::new(crate::RecordingNotifier::new());
        let mut manager =
            BookmarkManager::new(Arc::new(ReadOnlyStore)).with_notifier(notifier.clone());
        let mut events = manager.subscribe();

        assert!(manager.toggle_bookmark("b1", BookmarkKind::Bounty));
        assert!(manager.is_bookmarked("b1", BookmarkKind::Bounty));
        events.recv().await.unwrap();

        let notices = notifier.notices();
        assert_eq!(notices.len(), 2);
        assert_eq!(notices[0].level, NoticeLevel::Success);
        assert_eq!(notices[1].level, NoticeLevel::Error);
        assert_eq!(notices[1].message, BOOKMARK_SAVE_FAILED);
    }
}

//! In-process change notification.

use tokio::sync::broadcast;

/// Capacity of the broadcast buffer. Slow subscribers that fall further
/// behind see a `Lagged` error and should simply reload.
const CHANNEL_CAPACITY: usize = 64;

/// Fired after every bookmark mutation. Carries no payload; receivers
/// re-read storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookmarksChanged;

/// Pub/sub channel shared by every bookmark manager over the same storage.
///
/// Delivery is at-least-once to live subscribers, with no ordering between
/// publishers. Cloning the bus shares the channel.
#[derive(Debug, Clone)]
pub struct ChangeBus {
    sender: broadcast::Sender<BookmarksChanged>,
}

impl ChangeBus {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { sender }
    }

    /// Announce a change. Having no subscribers is not an error.
    pub fn publish(&self) {
        let receivers = self.sender.send(BookmarksChanged).unwrap_or(0);
        tracing::trace!(receivers, "bookmarks change published");
    }

    pub fn subscribe(&self) -> broadcast::Receiver<BookmarksChanged> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for ChangeBus {
    fn default() -> Self {
        Self::new()
    }
}

//! Winner draft manager.

use std::collections::HashSet;

use bountyboard_storage::{KeyValueStore, SharedStore, load_json, save_json};
use bountyboard_types::{WinnerDraft, WinnerPatch};

use crate::error::{Result, StateError};

/// Default storage key prefix; the bounty id is appended.
pub use bountyboard_types::defaults::WINNERS_PREFIX as DEFAULT_WINNERS_PREFIX;

/// Staging area for ranking a bounty's winners before submission.
///
/// Invariants held after every operation:
/// - at most one draft per position,
/// - at most one draft per user,
/// - drafts sorted ascending by position.
///
/// Each bounty has its own storage slot (`prefix + bounty_id`), written after
/// every change.
pub struct WinnerDraftManager {
    store: SharedStore,
    prefix: String,
    bounty_id: String,
    winners: Vec<WinnerDraft>,
}

impl std::fmt::Debug for WinnerDraftManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WinnerDraftManager")
            .field("bounty_id", &self.bounty_id)
            .field("winners", &self.winners)
            .finish()
    }
}

impl WinnerDraftManager {
    /// Open the drafts for `bounty_id`, seeded from storage.
    pub fn new(store: SharedStore, bounty_id: impl Into<String>) -> Self {
        Self::with_prefix(store, DEFAULT_WINNERS_PREFIX, bounty_id)
    }

    /// Open the drafts for `bounty_id` under a custom key prefix.
    pub fn with_prefix(
        store: SharedStore,
        prefix: impl Into<String>,
        bounty_id: impl Into<String>,
    ) -> Self {
        let mut manager = Self {
            store,
            prefix: prefix.into(),
            bounty_id: bounty_id.into(),
            winners: Vec::new(),
        };
        manager.winners = manager.load();
        manager
    }

    pub fn bounty_id(&self) -> &str {
        &self.bounty_id
    }

    /// Storage key of the current bounty's slot.
    pub fn storage_key(&self) -> String {
        format!("{}{}", self.prefix, self.bounty_id)
    }

    /// Switch to another bounty, loading its drafts. Returns `false` (and
    /// keeps the in-memory drafts) when `bounty_id` is already current.
    pub fn set_bounty(&mut self, bounty_id: &str) -> bool {
        if self.bounty_id == bounty_id {
            return false;
        }
        self.bounty_id = bounty_id.to_string();
        self.winners = self.load();
        tracing::debug!(bounty_id, winners = self.winners.len(), "switched bounty");
        true
    }

    /// Assign a winner. Whoever held the same position, and any earlier
    /// draft for the same user, is replaced.
    pub fn add_winner(&mut self, winner: WinnerDraft) -> Result<()> {
        validate(&winner)?;
        insert(&mut self.winners, winner);
        self.persist();
        Ok(())
    }

    /// Remove the draft at `position`, returning it.
    pub fn remove_winner(&mut self, position: u32) -> Option<WinnerDraft> {
        let index = self.winners.iter().position(|w| w.position == position)?;
        let removed = self.winners.remove(index);
        self.persist();
        Some(removed)
    }

    /// Merge `patch` into the draft at `position`. Returns `false` and changes
    /// nothing when no draft holds that position.
    pub fn update_winner(&mut self, position: u32, patch: WinnerPatch) -> Result<bool> {
        if let Some(amount) = patch.amount {
            validate_amount(amount)?;
        }
        let Some(winner) = self.winners.iter_mut().find(|w| w.position == position) else {
            return Ok(false);
        };
        winner.apply(patch);
        self.persist();
        Ok(true)
    }

    /// Drop every draft and delete the bounty's storage slot.
    pub fn clear_winners(&mut self) {
        self.winners.clear();
        let key = self.storage_key();
        if let Err(e) = self.store.remove(&key) {
            tracing::warn!(key = %key, error = %e, "failed to remove winner drafts");
        }
    }

    /// Positions in `1..=total` that nobody holds yet.
    ///
    /// Allocates up to `total` entries, so `total` should come from a bounded
    /// source such as the bounty's prize count.
    pub fn available_positions(&self, total: u32) -> Vec<u32> {
        let taken: HashSet<u32> = self.winners.iter().map(|w| w.position).collect();
        (1..=total).filter(|p| !taken.contains(p)).collect()
    }

    pub fn is_position_taken(&self, position: u32) -> bool {
        self.winners.iter().any(|w| w.position == position)
    }

    /// Drafts, sorted by position.
    pub fn winners(&self) -> &[WinnerDraft] {
        &self.winners
    }

    pub fn winner_at(&self, position: u32) -> Option<&WinnerDraft> {
        self.winners.iter().find(|w| w.position == position)
    }

    /// Sum of all assigned prize amounts.
    pub fn total_amount(&self) -> f64 {
        self.winners.iter().map(|w| w.amount).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.winners.is_empty()
    }

    pub fn len(&self) -> usize {
        self.winners.len()
    }

    /// Read this bounty's drafts, re-establishing the invariants in case the
    /// stored data was written by something less careful.
    fn load(&self) -> Vec<WinnerDraft> {
        let key = self.storage_key();
        let stored: Vec<WinnerDraft> = load_json(self.store.as_ref(), &key).unwrap_or_default();

        let mut winners = Vec::with_capacity(stored.len());
        for draft in stored {
            if validate(&draft).is_ok() {
                insert(&mut winners, draft);
            } else {
                tracing::warn!(key = %key, position = draft.position, "skipping invalid stored draft");
            }
        }
        winners
    }

    fn persist(&self) {
        let key = self.storage_key();
        if let Err(e) = save_json(self.store.as_ref(), &key, &self.winners) {
            tracing::warn!(key = %key, error = %e, "failed to persist winner drafts");
        }
    }
}

/// Insert keeping one draft per position and per user, sorted by position.
fn insert(winners: &mut Vec<WinnerDraft>, winner: WinnerDraft) {
    winners.retain(|w| w.position != winner.position && w.user_id != winner.user_id);
    winners.push(winner);
    winners.sort_by_key(|w| w.position);
}

fn validate(winner: &WinnerDraft) -> Result<()> {
    if winner.position == 0 {
        return Err(StateError::InvalidPosition(winner.position));
    }
    validate_amount(winner.amount)
}

fn validate_amount(amount: f64) -> Result<()> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(StateError::InvalidAmount(amount));
    }
    Ok(())
}

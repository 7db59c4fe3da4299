//! Winner drafts staged before submission.

use serde::{Deserialize, Serialize};

/// A not-yet-submitted assignment of a prize position to a candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WinnerDraft {
    pub submission_id: String,
    pub user_id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    /// 1-based rank.
    pub position: u32,
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
}

impl WinnerDraft {
    pub fn new(
        submission_id: impl Into<String>,
        user_id: impl Into<String>,
        name: impl Into<String>,
        position: u32,
        amount: f64,
    ) -> Self {
        Self {
            submission_id: submission_id.into(),
            user_id: user_id.into(),
            name: name.into(),
            avatar: None,
            position,
            amount,
            feedback: None,
            rating: None,
        }
    }

    /// Merge the set fields of `patch` into this draft.
    pub fn apply(&mut self, patch: WinnerPatch) {
        if let Some(submission_id) = patch.submission_id {
            self.submission_id = submission_id;
        }
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(avatar) = patch.avatar {
            self.avatar = Some(avatar);
        }
        if let Some(amount) = patch.amount {
            self.amount = amount;
        }
        if let Some(feedback) = patch.feedback {
            self.feedback = Some(feedback);
        }
        if let Some(rating) = patch.rating {
            self.rating = Some(rating);
        }
    }
}

/// Partial update for a draft. Position and user are the draft's identity
/// and cannot be changed through a patch; re-add the winner instead.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WinnerPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submission_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
}

impl WinnerPatch {
    pub fn is_empty(&self) -> bool {
        self == &WinnerPatch::default()
    }
}

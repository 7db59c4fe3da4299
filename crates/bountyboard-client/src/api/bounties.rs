//! Bounties API.

use bountyboard_types::{Bounty, WinnerDraft};

use crate::client::BountyClient;
use crate::error::Result;
use crate::types::{ListQuery, SelectWinnersRequest, from_envelope};

/// Bounties API client.
pub struct BountiesApi {
    client: BountyClient,
}

impl BountiesApi {
    pub(crate) fn new(client: BountyClient) -> Self {
        Self { client }
    }

    /// List bounties.
    pub async fn list(&self, query: ListQuery) -> Result<Vec<Bounty>> {
        let body = self.client.get_with_query("bounties", query.pairs()).await?;
        from_envelope(body, &["bounties", "items"])
    }

    /// Get a bounty by ID.
    pub async fn get(&self, id: &str) -> Result<Bounty> {
        let body = self.client.get(&format!("bounties/{}", id)).await?;
        from_envelope(body, &["bounty"])
    }

    /// Submit the final winner selection for a bounty.
    pub async fn submit_winners(&self, bounty_id: &str, winners: &[WinnerDraft]) -> Result<()> {
        let request = SelectWinnersRequest {
            winners: winners.iter().map(Into::into).collect(),
        };
        self.client
            .post_empty(&format!("bounties/{}/winners", bounty_id), &request)
            .await?;
        tracing::info!(bounty_id, count = winners.len(), "winners submitted");
        Ok(())
    }
}

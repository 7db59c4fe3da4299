//! Bookmark hydration.

use bountyboard_types::{BookmarkItem, BookmarkKind, Listing};
use futures::future::join_all;

use crate::client::BountyClient;
use crate::error::Result;

/// Resolves saved references into full listings.
pub struct BookmarksApi {
    client: BountyClient,
}

impl BookmarksApi {
    pub(crate) fn new(client: BountyClient) -> Self {
        Self { client }
    }

    /// Fetch one saved reference.
    pub async fn fetch(&self, item: &BookmarkItem) -> Result<Listing> {
        match item.kind {
            BookmarkKind::Bounty => Ok(Listing::Bounty(self.client.bounties().get(&item.id).await?)),
            BookmarkKind::Project => {
                Ok(Listing::Project(self.client.projects().get(&item.id).await?))
            }
        }
    }

    /// Fetch every saved reference concurrently, in bookmark order.
    ///
    /// Items that fail to load (deleted listing, network error) are logged
    /// and left out; the batch itself never fails.
    pub async fn hydrate(&self, items: &[BookmarkItem]) -> Vec<Listing> {
        let results = join_all(items.iter().map(|item| self.fetch(item))).await;

        items
            .iter()
            .zip(results)
            .filter_map(|(item, result)| match result {
                Ok(listing) => Some(listing),
                Err(e) => {
                    tracing::warn!(
                        id = %item.id,
                        kind = %item.kind,
                        error = %e,
                        "dropping bookmark that failed to load"
                    );
                    None
                }
            })
            .collect()
    }
}

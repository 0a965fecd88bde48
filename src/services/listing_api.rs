//! Trait for the rental listings provider.

use anyhow::Result;

/// Abstraction over a paginated rental listings provider.
///
/// Listing records stay opaque JSON here: this tool only collects them
/// for the downstream aggregation job, which owns their schema.
#[async_trait::async_trait]
pub trait ListingApi {
    /// Returns one page of listing records starting at `offset`.
    async fn fetch_page(&self, offset: usize, limit: usize) -> Result<Vec<serde_json::Value>>;
}

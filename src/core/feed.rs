//! Upstream data feed abstractions

use crate::core::country::{RawCountry, Rates};
use crate::core::error::FetchError;
use async_trait::async_trait;

/// Result of one successful fetch of both feeds.
#[derive(Debug, Clone, Default)]
pub struct FeedData {
    pub countries: Vec<RawCountry>,
    pub rates: Rates,
}

#[async_trait]
pub trait FeedProvider: Send + Sync {
    /// Fetches the countries feed and the rates feed. Fails if either fails.
    async fn fetch(&self) -> Result<FeedData, FetchError>;
}

//! Core business logic: the refresh pipeline and the country catalog

pub mod catalog;
pub mod config;
pub mod country;
pub mod error;
pub mod estimate;
pub mod feed;
pub mod log;
pub mod reconcile;
pub mod refresh;
pub mod snapshot;

// Re-export main types for cleaner imports
pub use country::{Country, RefreshStatus};
pub use error::Error;
pub use feed::{FeedData, FeedProvider};
pub use refresh::{RefreshReport, Refresher};

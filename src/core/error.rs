//! Error kinds surfaced by the refresh pipeline and the catalog operations.

/// Failure of one of the two upstream feeds.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request to {feed} feed failed: {source}")]
    Request {
        feed: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{feed} feed returned status {status}")]
    Status {
        feed: &'static str,
        status: reqwest::StatusCode,
    },
}

/// Failure of the country store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("fjall error: {0}")]
    Fjall(#[from] fjall::Error),

    #[error("failed to encode or decode record: {0}")]
    Codec(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("store error: {0}")]
    Backend(String),
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Either feed failed; which one is only visible in the logs.
    #[error("could not fetch data from one or more external sources")]
    ExternalFetch(#[source] FetchError),

    #[error(transparent)]
    Storage(#[from] StoreError),

    #[error("{0} not found")]
    NotFound(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl Error {
    /// Process exit code for the CLI.
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::ExternalFetch(_) => 3,
            Self::NotFound(_) => 2,
            Self::Storage(_) | Self::Internal(_) => 1,
        }
    }

    /// True for conditions the caller is expected to handle.
    pub const fn is_expected(&self) -> bool {
        matches!(self, Self::ExternalFetch(_) | Self::NotFound(_))
    }
}

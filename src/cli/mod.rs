//! Command line front-end over the refresh pipeline and the catalog

pub mod countries;
pub mod refresh;
pub mod setup;
pub mod status;
pub mod ui;

use crate::core::error::Error;

/// Message and exit code for a failed command.
///
/// Expected conditions are shown as-is; anything else is reported as an
/// internal error with the detail left to the logs.
pub fn describe_failure(err: &anyhow::Error) -> (String, i32) {
    match err.downcast_ref::<Error>() {
        Some(e @ Error::ExternalFetch(_)) => {
            (format!("External data source unavailable: {e}"), e.exit_code())
        }
        Some(e @ Error::NotFound(_)) => (e.to_string(), e.exit_code()),
        Some(e) => (
            "Internal error (run with --verbose for details)".to_string(),
            e.exit_code(),
        ),
        None => (err.to_string(), 1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::{FetchError, StoreError};

    #[test]
    fn test_describe_failure() {
        let err = anyhow::Error::from(Error::NotFound("Country 'Atlantis'".to_string()));
        assert_eq!(
            describe_failure(&err),
            ("Country 'Atlantis' not found".to_string(), 2)
        );

        let err = anyhow::Error::from(Error::ExternalFetch(FetchError::Status {
            feed: "countries",
            status: reqwest::StatusCode::SERVICE_UNAVAILABLE,
        }));
        let (message, code) = describe_failure(&err);
        assert!(message.starts_with("External data source unavailable"));
        assert!(!message.contains("countries"));
        assert_eq!(code, 3);

        let err = anyhow::Error::from(Error::from(StoreError::Backend("disk".to_string())));
        let (message, code) = describe_failure(&err);
        assert!(message.starts_with("Internal error"));
        assert_eq!(code, 1);

        let err = anyhow::anyhow!("Failed to read config file: /nope");
        assert_eq!(describe_failure(&err).1, 1);
    }
}

//! Refresh coordinator: fetch, estimate, reconcile and commit, then snapshot.
use crate::core::country::{RawCountry, RefreshStatus};
use crate::core::error::{Error, StoreError};
use crate::core::estimate::{Estimate, MultiplierSource, estimate};
use crate::core::feed::{FeedData, FeedProvider};
use crate::core::reconcile::{ReconcileSummary, reconcile};
use crate::core::snapshot;
use crate::store::{CountryStore, Transaction};
use chrono::{DateTime, Utc};
use std::path::PathBuf;
use tracing::{debug, error, info, warn};

/// Outcome of a successful refresh.
#[derive(Debug, Clone, PartialEq)]
pub struct RefreshReport {
    pub total_countries: usize,
    pub inserted: usize,
    pub updated: usize,
    pub skipped: usize,
    pub last_refreshed_at: DateTime<Utc>,
    /// Path of the summary image, `None` when rendering failed.
    pub snapshot: Option<PathBuf>,
}

pub struct Refresher<'a> {
    feed: &'a dyn FeedProvider,
    store: &'a dyn CountryStore,
    multiplier: &'a dyn MultiplierSource,
    snapshot_dir: PathBuf,
}

impl<'a> Refresher<'a> {
    pub fn new(
        feed: &'a dyn FeedProvider,
        store: &'a dyn CountryStore,
        multiplier: &'a dyn MultiplierSource,
        snapshot_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            feed,
            store,
            multiplier,
            snapshot_dir: snapshot_dir.into(),
        }
    }

    /// Runs one refresh cycle.
    ///
    /// Storage is not touched when the fetch fails. Countries and the status
    /// record are committed together or not at all. The summary image is
    /// generated after the commit and a failure there is only logged.
    pub async fn refresh(&self) -> Result<RefreshReport, Error> {
        info!("Refreshing country data");
        let FeedData { countries, rates } = self.feed.fetch().await.map_err(|e| {
            error!(error = %e, "External fetch failed");
            Error::ExternalFetch(e)
        })?;
        let refreshed_at = Utc::now();

        debug!(
            countries = countries.len(),
            rates = rates.len(),
            "Estimating GDP"
        );
        let incoming: Vec<(RawCountry, Estimate)> = countries
            .into_iter()
            .map(|raw| {
                let estimate = estimate(&raw, &rates, self.multiplier);
                (raw, estimate)
            })
            .collect();

        let (summary, total_countries) = self.commit(incoming, refreshed_at)?;
        info!(
            total_countries,
            inserted = summary.inserted,
            updated = summary.updated,
            "Committed refresh"
        );

        let snapshot = match snapshot::generate_snapshot(self.store, &self.snapshot_dir) {
            Ok(path) => Some(path),
            Err(e) => {
                warn!(error = %e, "Failed to generate summary image");
                None
            }
        };

        Ok(RefreshReport {
            total_countries,
            inserted: summary.inserted,
            updated: summary.updated,
            skipped: summary.skipped,
            last_refreshed_at: refreshed_at,
            snapshot,
        })
    }

    // Kept synchronous so the transaction never lives across an await point.
    fn commit(
        &self,
        incoming: Vec<(RawCountry, Estimate)>,
        refreshed_at: DateTime<Utc>,
    ) -> Result<(ReconcileSummary, usize), StoreError> {
        let mut tx = Transaction::begin(self.store);
        let summary = reconcile(&mut tx, incoming, refreshed_at)?;

        let total_countries = tx.count()?;
        tx.set_status(RefreshStatus {
            total_countries,
            last_refreshed_at: Some(refreshed_at),
        });
        tx.commit()?;
        Ok((summary, total_countries))
    }
}

//! Matches incoming feed records against stored countries and stages
//! inserts and updates inside a transaction.
use crate::core::country::{Country, RawCountry};
use crate::core::error::StoreError;
use crate::core::estimate::Estimate;
use crate::store::Transaction;
use chrono::{DateTime, Utc};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileSummary {
    pub inserted: usize,
    pub updated: usize,
    pub skipped: usize,
}

/// Stages every incoming record into `tx`.
///
/// Records are processed in order; each lookup sees the records staged
/// before it, so case variants of one name inside a batch collapse into a
/// single country. An existing country keeps its stored name casing.
pub fn reconcile(
    tx: &mut Transaction<'_>,
    incoming: Vec<(RawCountry, Estimate)>,
    refreshed_at: DateTime<Utc>,
) -> Result<ReconcileSummary, StoreError> {
    let mut summary = ReconcileSummary::default();

    for (raw, estimate) in incoming {
        if raw.name.trim().is_empty() {
            warn!("Skipping feed record without a name");
            summary.skipped += 1;
            continue;
        }

        let name = match tx.find_by_name(&raw.name)? {
            Some(existing) => {
                debug!(name = %existing.name, incoming = %raw.name, "Updating country");
                summary.updated += 1;
                existing.name
            }
            None => {
                debug!(name = %raw.name, "Inserting country");
                summary.inserted += 1;
                raw.name
            }
        };

        tx.put(Country {
            name,
            capital: raw.capital,
            region: raw.region,
            population: raw.population,
            currency_code: estimate.currency_code,
            exchange_rate: estimate.exchange_rate,
            estimated_gdp: estimate.estimated_gdp,
            flag_url: raw.flag,
            last_refreshed_at: refreshed_at,
        });
    }

    Ok(summary)
}

use super::{CountryStore, WriteSet};
use crate::core::country::{Country, RefreshStatus};
use crate::core::error::StoreError;
use fjall::{Keyspace, PartitionCreateOptions, PartitionHandle, PersistMode};
use std::fmt::Display;
use std::path::Path;
use tracing::{debug, warn};

const COUNTRIES_PARTITION: &str = "countries";
const META_PARTITION: &str = "meta";
const STATUS_KEY: &str = "status";

/// Country store persisted in a fjall keyspace.
///
/// Countries live in their own partition keyed by normalized name; the
/// refresh status is a single entry in the meta partition. Refresh writes
/// are committed as one cross-partition batch.
pub struct FjallStore {
    keyspace: Keyspace,
    countries: PartitionHandle,
    meta: PartitionHandle,
}

impl FjallStore {
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        std::fs::create_dir_all(path)?;

        let keyspace = fjall::Config::new(path).open()?;
        let countries =
            keyspace.open_partition(COUNTRIES_PARTITION, PartitionCreateOptions::default())?;
        let meta = keyspace.open_partition(META_PARTITION, PartitionCreateOptions::default())?;
        debug!("Opened country store at {}", path.display());

        Ok(Self {
            keyspace,
            countries,
            meta,
        })
    }
}

/// Reports the outcome of syncing the journal after a write.
///
/// Committed writes are already visible, so a failed sync is logged and the
/// write still counts as done.
fn synced<E: Display>(result: Result<(), E>) -> bool {
    match result {
        Ok(()) => true,
        Err(e) => {
            warn!(error = %e, "Failed to sync country store to disk");
            false
        }
    }
}

impl CountryStore for FjallStore {
    fn get(&self, key: &str) -> Result<Option<Country>, StoreError> {
        match self.countries.get(key)? {
            Some(value) => {
                debug!(key, "Store HIT");
                Ok(Some(serde_json::from_slice(&value)?))
            }
            None => {
                debug!(key, "Store MISS");
                Ok(None)
            }
        }
    }

    fn count(&self) -> Result<usize, StoreError> {
        Ok(self.countries.len()?)
    }

    fn all(&self) -> Result<Vec<Country>, StoreError> {
        self.countries
            .iter()
            .map(|item| {
                let (_, value) = item?;
                Ok(serde_json::from_slice(&value)?)
            })
            .collect()
    }

    fn remove(&self, key: &str) -> Result<bool, StoreError> {
        if !self.countries.contains_key(key)? {
            return Ok(false);
        }
        self.countries.remove(key)?;
        let synced = synced(self.keyspace.persist(PersistMode::SyncAll));
        debug!(key, synced, "Store REMOVE");
        Ok(true)
    }

    fn status(&self) -> Result<Option<RefreshStatus>, StoreError> {
        self.meta
            .get(STATUS_KEY)?
            .map(|value| serde_json::from_slice(&value))
            .transpose()
            .map_err(StoreError::from)
    }

    fn apply(&self, writes: WriteSet) -> Result<(), StoreError> {
        let mut batch = self.keyspace.batch();
        let count = writes.countries.len();
        for (key, country) in writes.countries {
            batch.insert(&self.countries, key, serde_json::to_vec(&country)?);
        }
        if let Some(status) = writes.status {
            batch.insert(&self.meta, STATUS_KEY, serde_json::to_vec(&status)?);
        }
        batch.commit()?;
        let synced = synced(self.keyspace.persist(PersistMode::SyncAll));
        debug!(countries = count, synced, "Store APPLY");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Transaction;
    use crate::store::test_support::country;
    use chrono::Utc;
    use tempfile::tempdir;

    #[test]
    fn test_fjall_store_commit_and_read() {
        let dir = tempdir().unwrap();
        let store = FjallStore::open(dir.path()).unwrap();

        assert!(store.status().unwrap().is_none());
        assert_eq!(store.count().unwrap(), 0);

        let now = Utc::now();
        let mut tx = Transaction::begin(&store);
        tx.put(country("France", "Europe", 10.0));
        tx.put(country("Ghana", "Africa", 0.0));
        tx.set_status(RefreshStatus {
            total_countries: 2,
            last_refreshed_at: Some(now),
        });
        tx.commit().unwrap();

        assert_eq!(store.count().unwrap(), 2);
        let france = store.get("france").unwrap().unwrap();
        assert_eq!(france.name, "France");
        assert_eq!(france.estimated_gdp, 10.0);
        assert!(store.get("France").unwrap().is_none());

        let status = store.status().unwrap().unwrap();
        assert_eq!(status.total_countries, 2);
        assert_eq!(status.last_refreshed_at, Some(now));

        let mut names: Vec<_> = store.all().unwrap().into_iter().map(|c| c.name).collect();
        names.sort();
        assert_eq!(names, vec!["France", "Ghana"]);
    }

    #[test]
    fn test_fjall_store_remove() {
        let dir = tempdir().unwrap();
        let store = FjallStore::open(dir.path()).unwrap();

        let mut tx = Transaction::begin(&store);
        tx.put(country("France", "Europe", 10.0));
        tx.commit().unwrap();

        assert!(store.remove("france").unwrap());
        assert!(!store.remove("france").unwrap());
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn test_failed_sync_is_not_an_error() {
        assert!(synced::<std::io::Error>(Ok(())));
        assert!(!synced(Err(std::io::Error::other("fsync failed"))));
    }

    #[test]
    fn test_fjall_store_survives_reopen() {
        let dir = tempdir().unwrap();
        {
            let store = FjallStore::open(dir.path()).unwrap();
            let mut tx = Transaction::begin(&store);
            tx.put(country("Spain", "Europe", 3.0));
            tx.set_status(RefreshStatus {
                total_countries: 1,
                last_refreshed_at: None,
            });
            tx.commit().unwrap();
        }

        let store = FjallStore::open(dir.path()).unwrap();
        assert_eq!(store.get("spain").unwrap().unwrap().name, "Spain");
        assert_eq!(store.status().unwrap().unwrap().total_countries, 1);
    }
}

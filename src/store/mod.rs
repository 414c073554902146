pub mod disk;
pub mod memory;

use crate::core::country::{Country, RefreshStatus, normalize_name};
use crate::core::error::StoreError;
use std::collections::BTreeMap;
use tracing::debug;

pub use disk::FjallStore;
pub use memory::MemoryStore;

/// Country collection keyed by normalized name, plus the refresh status
/// singleton.
///
/// Reads are independent single operations. All refresh writes go through
/// [`CountryStore::apply`], which must land the whole [`WriteSet`] or none
/// of it.
pub trait CountryStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<Country>, StoreError>;

    fn count(&self) -> Result<usize, StoreError>;

    fn all(&self) -> Result<Vec<Country>, StoreError>;

    /// Removes the record under `key`, returning whether it existed.
    fn remove(&self, key: &str) -> Result<bool, StoreError>;

    fn status(&self) -> Result<Option<RefreshStatus>, StoreError>;

    fn apply(&self, writes: WriteSet) -> Result<(), StoreError>;
}

/// Writes staged by a [`Transaction`], keyed by normalized name.
#[derive(Debug, Default, Clone)]
pub struct WriteSet {
    pub countries: BTreeMap<String, Country>,
    pub status: Option<RefreshStatus>,
}

impl WriteSet {
    pub fn is_empty(&self) -> bool {
        self.countries.is_empty() && self.status.is_none()
    }
}

/// Unit of work over a [`CountryStore`].
///
/// Lookups see writes staged earlier in the same transaction. Nothing reaches
/// the store until [`Transaction::commit`]; dropping the transaction discards
/// every staged write.
pub struct Transaction<'a> {
    store: &'a dyn CountryStore,
    writes: WriteSet,
}

impl<'a> Transaction<'a> {
    pub fn begin(store: &'a dyn CountryStore) -> Self {
        Self {
            store,
            writes: WriteSet::default(),
        }
    }

    /// Case-insensitive lookup by name.
    pub fn find_by_name(&self, name: &str) -> Result<Option<Country>, StoreError> {
        let key = normalize_name(name);
        if let Some(staged) = self.writes.countries.get(&key) {
            return Ok(Some(staged.clone()));
        }
        self.store.get(&key)
    }

    pub fn put(&mut self, country: Country) {
        self.writes.countries.insert(country.key(), country);
    }

    /// Live store count plus staged records the store does not hold yet.
    pub fn count(&self) -> Result<usize, StoreError> {
        let mut total = self.store.count()?;
        for key in self.writes.countries.keys() {
            if self.store.get(key)?.is_none() {
                total += 1;
            }
        }
        Ok(total)
    }

    pub fn set_status(&mut self, status: RefreshStatus) {
        self.writes.status = Some(status);
    }

    pub fn staged(&self) -> usize {
        self.writes.countries.len()
    }

    pub fn commit(self) -> Result<(), StoreError> {
        debug!(
            countries = self.writes.countries.len(),
            status = self.writes.status.is_some(),
            "Committing transaction"
        );
        if self.writes.is_empty() {
            return Ok(());
        }
        self.store.apply(self.writes)
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::country;
    use super::*;

    #[test]
    fn test_transaction_reads_own_writes() {
        let store = MemoryStore::new();
        let mut tx = Transaction::begin(&store);

        assert!(tx.find_by_name("France").unwrap().is_none());
        tx.put(country("France", "Europe", 10.0));

        let found = tx.find_by_name("FRANCE").unwrap().unwrap();
        assert_eq!(found.name, "France");
        assert_eq!(tx.staged(), 1);

        // Not visible outside until committed
        assert!(store.get("france").unwrap().is_none());
        tx.commit().unwrap();
        assert!(store.get("france").unwrap().is_some());
    }

    #[test]
    fn test_transaction_count_includes_new_keys_only() {
        let store = MemoryStore::new();
        let mut seed = Transaction::begin(&store);
        seed.put(country("France", "Europe", 10.0));
        seed.put(country("Spain", "Europe", 10.0));
        seed.commit().unwrap();

        let mut tx = Transaction::begin(&store);
        tx.put(country("France", "Europe", 20.0));
        tx.put(country("Ghana", "Africa", 5.0));
        assert_eq!(tx.count().unwrap(), 3);
    }

    #[test]
    fn test_dropped_transaction_writes_nothing() {
        let store = MemoryStore::new();
        {
            let mut tx = Transaction::begin(&store);
            tx.put(country("France", "Europe", 10.0));
            tx.set_status(RefreshStatus {
                total_countries: 1,
                last_refreshed_at: None,
            });
        }
        assert_eq!(store.count().unwrap(), 0);
        assert!(store.status().unwrap().is_none());
    }
}

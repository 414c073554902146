use super::{CountryStore, WriteSet};
use crate::core::country::{Country, RefreshStatus};
use crate::core::error::StoreError;
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;

#[derive(Default)]
struct State {
    countries: HashMap<String, Country>,
    status: Option<RefreshStatus>,
}

/// In-memory twin of [`super::FjallStore`], used by tests.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, State>, StoreError> {
        self.inner
            .read()
            .map_err(|_| StoreError::Backend("memory store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, State>, StoreError> {
        self.inner
            .write()
            .map_err(|_| StoreError::Backend("memory store lock poisoned".to_string()))
    }
}

impl CountryStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Country>, StoreError> {
        let state = self.read()?;
        let value = state.countries.get(key).cloned();
        debug!(key, hit = value.is_some(), "Memory store GET");
        Ok(value)
    }

    fn count(&self) -> Result<usize, StoreError> {
        Ok(self.read()?.countries.len())
    }

    fn all(&self) -> Result<Vec<Country>, StoreError> {
        Ok(self.read()?.countries.values().cloned().collect())
    }

    fn remove(&self, key: &str) -> Result<bool, StoreError> {
        let removed = self.write()?.countries.remove(key).is_some();
        debug!(key, removed, "Memory store REMOVE");
        Ok(removed)
    }

    fn status(&self) -> Result<Option<RefreshStatus>, StoreError> {
        Ok(self.read()?.status.clone())
    }

    fn apply(&self, writes: WriteSet) -> Result<(), StoreError> {
        let mut state = self.write()?;
        debug!(countries = writes.countries.len(), "Memory store APPLY");
        state.countries.extend(writes.countries);
        if let Some(status) = writes.status {
            state.status = Some(status);
        }
        Ok(())
    }
}

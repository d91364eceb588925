//! In-memory store backend.
//!
//! Keeps every entry in a shared `BTreeMap`, so it orders keys bytewise the
//! same way LevelDB's default comparator does. Used by tests and anywhere a
//! store has to exist without touching disk.

use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::Arc;

use crate::store::{KeyRange, KvStore, RawIter, StoreError};

type Entries = BTreeMap<Vec<u8>, Vec<u8>>;

/// In-memory [`KvStore`].
#[derive(Debug, Clone, Default)]
pub struct MemStore {
    entries: Arc<Entries>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries held.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for MemStore
where
    K: Into<Vec<u8>>,
    V: Into<Vec<u8>>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let entries = iter
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect();
        Self {
            entries: Arc::new(entries),
        }
    }
}

impl KvStore for MemStore {
    fn get(&mut self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn iter(&mut self, range: KeyRange) -> Result<Box<dyn RawIter>, StoreError> {
        Ok(Box::new(MemIter {
            entries: Arc::clone(&self.entries),
            range,
            current: None,
        }))
    }
}

struct MemIter {
    entries: Arc<Entries>,
    range: KeyRange,
    current: Option<Vec<u8>>,
}

impl MemIter {
    fn land(&mut self, found: Option<Vec<u8>>) -> bool {
        match found {
            Some(key) => {
                self.current = Some(key);
                true
            }
            None => false,
        }
    }
}

impl RawIter for MemIter {
    fn seek_first(&mut self) -> Result<bool, StoreError> {
        let found = self
            .entries
            .range::<[u8], _>((Bound::Included(self.range.start()), Bound::Unbounded))
            .next()
            .map(|(key, _)| key)
            .filter(|key| self.range.contains(key))
            .cloned();
        self.current = None;
        Ok(self.land(found))
    }

    fn step_forward(&mut self) -> Result<bool, StoreError> {
        let Some(current) = self.current.as_deref() else {
            return Ok(false);
        };
        let found = self
            .entries
            .range::<[u8], _>((Bound::Excluded(current), Bound::Unbounded))
            .next()
            .map(|(key, _)| key)
            .filter(|key| self.range.contains(key))
            .cloned();
        Ok(self.land(found))
    }

    fn step_back(&mut self) -> Result<bool, StoreError> {
        let Some(current) = self.current.as_deref() else {
            return Ok(false);
        };
        let found = self
            .entries
            .range::<[u8], _>((Bound::Unbounded, Bound::Excluded(current)))
            .next_back()
            .map(|(key, _)| key)
            .filter(|key| self.range.contains(key))
            .cloned();
        Ok(self.land(found))
    }

    fn key(&self) -> Option<&[u8]> {
        self.current.as_deref()
    }
}

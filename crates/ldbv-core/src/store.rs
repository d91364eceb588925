//! Read-only contract for the ordered key-value store being browsed.
//!
//! The browser never writes. Everything it needs from a backend is a point
//! lookup and a stepping iterator over a (possibly prefix-bounded) range.

use std::path::PathBuf;

/// Errors raised by a storage backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Nothing exists at the given store path.
    #[error("store not found at {}", .0.display())]
    NotFound(PathBuf),

    /// The backend refused to open the store.
    #[error("failed to open store: {0}")]
    Open(String),

    /// A read failed after the store was opened.
    #[error("store read failed: {0}")]
    Read(String),
}

/// The keys an iteration handle is allowed to visit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum KeyRange {
    /// Every key in the store.
    #[default]
    All,
    /// Only keys starting with these bytes.
    Prefix(Vec<u8>),
}

impl KeyRange {
    /// Builds a range from decoded prefix bytes. An empty prefix covers everything.
    pub fn prefix(prefix: impl Into<Vec<u8>>) -> Self {
        let prefix = prefix.into();
        if prefix.is_empty() {
            Self::All
        } else {
            Self::Prefix(prefix)
        }
    }

    /// The smallest key the range can contain, used as the seek target.
    pub fn start(&self) -> &[u8] {
        match self {
            Self::All => &[],
            Self::Prefix(prefix) => prefix,
        }
    }

    pub fn contains(&self, key: &[u8]) -> bool {
        match self {
            Self::All => true,
            Self::Prefix(prefix) => key.starts_with(prefix),
        }
    }
}

/// A stepping iterator over one [`KeyRange`].
///
/// Implementations must never leave the range: a step that would run past
/// either end returns `false` and leaves the iterator on the key it was on.
pub trait RawIter {
    /// Positions on the smallest key in range. Returns `false` when the range is empty.
    fn seek_first(&mut self) -> Result<bool, StoreError>;

    /// Moves to the next key in range.
    fn step_forward(&mut self) -> Result<bool, StoreError>;

    /// Moves to the previous key in range.
    fn step_back(&mut self) -> Result<bool, StoreError>;

    /// The key under the iterator, if it is positioned.
    fn key(&self) -> Option<&[u8]>;
}

/// A read-only handle to an ordered key-value store.
pub trait KvStore {
    /// Point lookup of a raw key.
    fn get(&mut self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError>;

    /// Opens a fresh iteration handle scoped to `range`.
    fn iter(&mut self, range: KeyRange) -> Result<Box<dyn RawIter>, StoreError>;

    /// Releases the store. Called after every iteration handle is gone.
    fn close(&mut self) -> Result<(), StoreError> {
        Ok(())
    }
}

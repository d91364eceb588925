//! [`KvStore`] over an on-disk LevelDB directory.

use std::fs;
use std::io;
use std::path::Path;

use ldbv_core::{KeyRange, KvStore, RawIter, StoreError};
use rusty_leveldb::{DB, DBIterator, LdbIterator, Options};
use tempfile::TempDir;
use tracing::{debug, info};

/// Lock file of a LevelDB directory. Never copied.
const LOCK_FILE: &str = "LOCK";

pub struct LevelDbStore {
    db: DB,
    // Declared after `db` so the database closes before its files go away.
    _copy: TempDir,
}

impl LevelDbStore {
    /// Opens an existing database without touching its files.
    ///
    /// Opening a LevelDB replays the log and may compact, which rewrites the
    /// directory. The database is therefore opened on a private copy that
    /// is removed on drop.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if !path.exists() {
            return Err(StoreError::NotFound(path.to_path_buf()));
        }

        let copy = copy_store(path).map_err(|err| {
            StoreError::Open(format!("failed to copy {}: {err}", path.display()))
        })?;

        let mut opts = Options::default();
        opts.create_if_missing = false;
        let db = DB::open(copy.path(), opts).map_err(|err| StoreError::Open(err.to_string()))?;
        info!(path = %path.display(), "opened leveldb store");
        Ok(Self { db, _copy: copy })
    }
}

/// Copies the regular files of a LevelDB directory into a fresh temp dir.
fn copy_store(path: &Path) -> io::Result<TempDir> {
    let copy = tempfile::Builder::new().prefix("ldbv-").tempdir()?;
    let mut files = 0usize;
    for entry in fs::read_dir(path)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() || entry.file_name() == LOCK_FILE {
            continue;
        }
        fs::copy(entry.path(), copy.path().join(entry.file_name()))?;
        files += 1;
    }
    debug!(files, copy = %copy.path().display(), "copied leveldb files");
    Ok(copy)
}

fn read_value<V: AsRef<[u8]>>(
    result: rusty_leveldb::Result<Option<V>>,
) -> Result<Option<Vec<u8>>, StoreError> {
    result
        .map(|value| value.map(|value| value.as_ref().to_vec()))
        .map_err(|err| StoreError::Read(err.to_string()))
}

impl KvStore for LevelDbStore {
    fn get(&mut self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        let snapshot = self.db.get_snapshot();
        read_value(self.db.get_at(&snapshot, key))
    }

    fn iter(&mut self, range: KeyRange) -> Result<Box<dyn RawIter>, StoreError> {
        let iter = self
            .db
            .new_iter()
            .map_err(|err| StoreError::Read(err.to_string()))?;
        Ok(Box::new(LevelDbIter {
            iter,
            range,
            key: None,
        }))
    }
}

struct LevelDbIter {
    iter: DBIterator,
    range: KeyRange,
    key: Option<Vec<u8>>,
}

impl LevelDbIter {
    /// Adopts the underlying position if it is a key inside the range.
    fn load(&mut self) -> bool {
        let mut key = Vec::new();
        let mut value = Vec::new();
        if self.iter.valid() && self.iter.current(&mut key, &mut value) && self.range.contains(&key)
        {
            self.key = Some(key);
            return true;
        }
        false
    }

    /// Puts the underlying iterator back on the last adopted key.
    fn restore(&mut self) {
        if let Some(key) = self.key.as_deref() {
            self.iter.seek(key);
        }
    }
}

impl RawIter for LevelDbIter {
    fn seek_first(&mut self) -> Result<bool, StoreError> {
        self.key = None;
        let start = self.range.start().to_vec();
        if start.is_empty() {
            self.iter.reset();
            self.iter.advance();
        } else {
            self.iter.seek(&start);
        }
        Ok(self.load())
    }

    fn step_forward(&mut self) -> Result<bool, StoreError> {
        if self.key.is_none() {
            return Ok(false);
        }
        if self.iter.advance() && self.load() {
            return Ok(true);
        }
        self.restore();
        Ok(false)
    }

    fn step_back(&mut self) -> Result<bool, StoreError> {
        if self.key.is_none() {
            return Ok(false);
        }
        if self.iter.prev() && self.load() {
            return Ok(true);
        }
        self.restore();
        Ok(false)
    }

    fn key(&self) -> Option<&[u8]> {
        self.key.as_deref()
    }
}

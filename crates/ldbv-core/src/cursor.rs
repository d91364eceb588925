//! The single live iteration position into the store.
//!
//! [`Cursor`] is the only thing allowed to move through the store. It owns
//! one [`RawIter`] at a time; reseeking drops the old handle and opens a new
//! one for the new range.

use tracing::debug;

use crate::store::{KeyRange, KvStore, RawIter, StoreError};

/// Where the cursor is relative to the keys it has handed out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorState {
    /// Freshly (re)seeked. The next advance yields the first key of the range.
    Unpositioned,
    /// Resting on a key reached by stepping forward.
    Forward,
    /// Resting on a key reached by stepping backward.
    Backward,
    /// Stepping forward ran out of keys; resting on the last key of the range.
    ExhaustedForward,
    /// Stepping backward ran out of keys; resting on the first key of the range.
    ExhaustedBackward,
    /// The range holds no keys at all.
    Empty,
}

/// Keys visited by one [`Cursor::advance`] or [`Cursor::retreat`], in visit order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Step {
    pub keys: Vec<Vec<u8>>,
    /// The end of the range (start, when retreating) was hit.
    pub hit_boundary: bool,
}

impl Step {
    fn boundary(keys: Vec<Vec<u8>>) -> Self {
        Self {
            keys,
            hit_boundary: true,
        }
    }
}

pub struct Cursor {
    iter: Box<dyn RawIter>,
    range: KeyRange,
    state: CursorState,
}

impl std::fmt::Debug for Cursor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cursor")
            .field("range", &self.range)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl Cursor {
    /// Opens a handle on `range` and rewinds to its first key.
    pub fn open<S: KvStore + ?Sized>(store: &mut S, range: KeyRange) -> Result<Self, StoreError> {
        let iter = store.iter(range.clone())?;
        let mut cursor = Self {
            iter,
            range,
            state: CursorState::Unpositioned,
        };
        cursor.seek_first()?;
        Ok(cursor)
    }

    pub fn state(&self) -> CursorState {
        self.state
    }

    pub fn range(&self) -> &KeyRange {
        &self.range
    }

    /// The key the cursor rests on. `None` until something has been visited.
    pub fn current_key(&self) -> Option<&[u8]> {
        match self.state {
            CursorState::Unpositioned | CursorState::Empty => None,
            _ => self.iter.key(),
        }
    }

    /// Rewinds so the next [`advance`](Self::advance) starts at the smallest key.
    ///
    /// Returns `false` when the range is empty.
    pub fn seek_first(&mut self) -> Result<bool, StoreError> {
        let found = self.iter.seek_first()?;
        self.state = if found {
            CursorState::Unpositioned
        } else {
            CursorState::Empty
        };
        Ok(found)
    }

    /// Steps forward up to `n` times, returning the keys visited.
    pub fn advance(&mut self, n: usize) -> Result<Step, StoreError> {
        let mut keys = Vec::with_capacity(n);
        if n == 0 {
            return Ok(Step::default());
        }

        match self.state {
            CursorState::Empty | CursorState::ExhaustedForward => {
                return Ok(Step::boundary(keys));
            }
            CursorState::Unpositioned => {
                keys.extend(self.iter.key().map(<[u8]>::to_vec));
                self.state = CursorState::Forward;
            }
            CursorState::Forward | CursorState::Backward | CursorState::ExhaustedBackward => {}
        }

        while keys.len() < n {
            if !self.iter.step_forward()? {
                self.state = CursorState::ExhaustedForward;
                return Ok(Step::boundary(keys));
            }
            keys.extend(self.iter.key().map(<[u8]>::to_vec));
            self.state = CursorState::Forward;
        }

        Ok(Step {
            keys,
            hit_boundary: false,
        })
    }

    /// Steps backward up to `n` times, returning the keys visited (descending).
    pub fn retreat(&mut self, n: usize) -> Result<Step, StoreError> {
        let mut keys = Vec::with_capacity(n);
        if n == 0 {
            return Ok(Step::default());
        }

        match self.state {
            // Nothing lies before a key that has not been handed out yet.
            CursorState::Empty | CursorState::Unpositioned | CursorState::ExhaustedBackward => {
                return Ok(Step::boundary(keys));
            }
            CursorState::Forward | CursorState::Backward | CursorState::ExhaustedForward => {}
        }

        while keys.len() < n {
            if !self.iter.step_back()? {
                self.state = CursorState::ExhaustedBackward;
                return Ok(Step::boundary(keys));
            }
            keys.extend(self.iter.key().map(<[u8]>::to_vec));
            self.state = CursorState::Backward;
        }

        Ok(Step {
            keys,
            hit_boundary: false,
        })
    }

    /// Swaps the handle for one scoped to keys starting with `prefix`.
    ///
    /// `prefix` must already be decoded from the operator's input.
    pub fn reseek_prefix<S: KvStore + ?Sized>(
        &mut self,
        store: &mut S,
        prefix: Vec<u8>,
    ) -> Result<(), StoreError> {
        self.reseek(store, KeyRange::prefix(prefix))
    }

    /// Swaps the handle for a full-range one.
    pub fn reseek_all<S: KvStore + ?Sized>(&mut self, store: &mut S) -> Result<(), StoreError> {
        self.reseek(store, KeyRange::All)
    }

    fn reseek<S: KvStore + ?Sized>(
        &mut self,
        store: &mut S,
        range: KeyRange,
    ) -> Result<(), StoreError> {
        debug!(?range, "reseek");
        // Open the replacement first; the old handle is released on assignment.
        self.iter = store.iter(range.clone())?;
        self.range = range;
        self.seek_first()?;
        Ok(())
    }
}

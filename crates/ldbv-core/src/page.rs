//! The window of keys currently on screen.
//!
//! The cursor always rests on the window edge it walked to last: the last
//! row after a forward fill, the first row after a backward fill. Turning
//! around therefore means walking across the rows already shown before new
//! ones can be read; [`PageWindow::replay_skip`] does exactly that.

use tracing::debug;

use crate::codec::{KeyFormat, encode_key};
use crate::cursor::Cursor;
use crate::store::StoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub raw_key: Vec<u8>,
    pub label: String,
}

impl Row {
    fn new(raw_key: Vec<u8>, format: KeyFormat) -> Self {
        let label = encode_key(&raw_key, format);
        Self { raw_key, label }
    }
}

#[derive(Debug, Clone)]
pub struct PageWindow {
    rows: Vec<Row>,
    page_size: usize,
    /// Position of the first row within the cursor's range.
    offset: usize,
    /// 1-based page counter, 0 while nothing is shown.
    page: usize,
    last_move: Option<Direction>,
}

impl PageWindow {
    pub fn new(page_size: usize) -> Self {
        Self {
            rows: Vec::new(),
            page_size: page_size.max(1),
            offset: 0,
            page: 0,
            last_move: None,
        }
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn last_move(&self) -> Option<Direction> {
        self.last_move
    }

    /// Net count of successful page moves since the last reset, 1-based.
    pub fn page_number(&self) -> usize {
        self.page
    }

    pub fn is_first_page(&self) -> bool {
        self.offset == 0
    }

    /// Takes effect on the next fill; rows already shown stay as they are.
    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size.max(1);
    }

    /// Forgets the window after the cursor was reseeked.
    pub fn reset(&mut self) {
        self.rows.clear();
        self.offset = 0;
        self.page = 0;
        self.last_move = None;
    }

    pub fn relabel(&mut self, format: KeyFormat) {
        for row in &mut self.rows {
            row.label = encode_key(&row.raw_key, format);
        }
    }

    /// Loads the page after the current one. Returns `false` when there is none.
    pub fn fill_forward(&mut self, cursor: &mut Cursor, format: KeyFormat) -> Result<bool, StoreError> {
        if self.last_move == Some(Direction::Backward) {
            self.replay_skip(cursor, Direction::Forward)?;
        }

        let step = cursor.advance(self.page_size)?;
        if step.keys.is_empty() {
            return Ok(false);
        }

        self.offset += self.rows.len();
        self.page += 1;
        self.rows = step
            .keys
            .into_iter()
            .map(|key| Row::new(key, format))
            .collect();
        self.last_move = Some(Direction::Forward);
        debug!(page = self.page_number(), rows = self.rows.len(), "filled forward");
        Ok(true)
    }

    /// Loads the page before the current one. Returns `false` on the first page.
    pub fn fill_backward(
        &mut self,
        cursor: &mut Cursor,
        format: KeyFormat,
    ) -> Result<bool, StoreError> {
        if self.rows.is_empty() || self.is_first_page() {
            return Ok(false);
        }

        if self.last_move == Some(Direction::Forward) {
            self.replay_skip(cursor, Direction::Backward)?;
        }

        let step = cursor.retreat(self.page_size)?;
        if step.keys.is_empty() {
            return Ok(false);
        }

        let mut keys = step.keys;
        keys.reverse();
        self.offset = self.offset.saturating_sub(keys.len());

        if step.hit_boundary && keys.len() < self.page_size {
            // Ran into the start early (the page size grew since these rows
            // were loaded). Top up so page one is a full page.
            cursor.advance(keys.len() - 1)?;
            let more = cursor.advance(self.page_size - keys.len())?;
            keys.extend(more.keys);
            self.offset = 0;
            self.page = 1;
            self.last_move = Some(Direction::Forward);
        } else {
            // Reaching the start of the range is page one whatever the count says.
            self.page = if self.offset == 0 {
                1
            } else {
                self.page.saturating_sub(1).max(1)
            };
            self.last_move = Some(Direction::Backward);
        }

        self.rows = keys.into_iter().map(|key| Row::new(key, format)).collect();
        debug!(page = self.page_number(), rows = self.rows.len(), "filled backward");
        Ok(true)
    }

    /// Walks the cursor across the rows on screen, from the edge it rests on
    /// to the opposite edge, so the next fill in `toward` continues from there.
    pub fn replay_skip(&mut self, cursor: &mut Cursor, toward: Direction) -> Result<(), StoreError> {
        let span = self.rows.len().saturating_sub(1);
        match toward {
            Direction::Forward => cursor.advance(span)?,
            Direction::Backward => cursor.retreat(span)?,
        };
        self.last_move = Some(toward);
        Ok(())
    }
}

//! Navigation controller: turns input events into cursor, window and option
//! changes, and tracks which region has focus.
//!
//! Nothing in here knows about a terminal. A front end maps its own key
//! events onto [`NavEvent`] and reads the getters back when drawing.

use tracing::{debug, info, warn};

use crate::codec::{decode_key, encode_key, encode_value};
use crate::cursor::Cursor;
use crate::options::{Directive, DisplayOptions, StartupConfig, parse_directive};
use crate::page::{PageWindow, Row};
use crate::store::{KeyRange, KvStore, StoreError};

const VALUE_PAGE_LINES: u16 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    List,
    Value,
    Search,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavEvent {
    Up,
    Down,
    PageUp,
    PageDown,
    Home,
    Enter,
    Back,
    FocusSearch,
    Char(char),
    Backspace,
}

/// Errors that end a session. Bad directives are not among them; those are
/// reported through [`Session::search_error`].
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone, Default)]
struct SearchBox {
    text: String,
    /// Text of the last search that was applied; restored on cancel.
    committed: String,
    error: Option<String>,
}

pub struct Session<S: KvStore> {
    // Field order matters: the cursor's iteration handle is dropped before the store.
    cursor: Cursor,
    store: S,
    window: PageWindow,
    options: DisplayOptions,
    focus: Focus,
    selected: usize,
    value: Option<Vec<u8>>,
    value_scroll: u16,
    search: SearchBox,
}

impl<S: KvStore> Session<S> {
    /// Opens the first page of `store` as described by `config`.
    pub fn new(mut store: S, config: &StartupConfig) -> Result<Self, SessionError> {
        let options = config.display_options();
        let mut search = SearchBox::default();
        let range = match config.initial_prefix.as_deref() {
            Some(prefix) if !prefix.is_empty() => {
                search.text = prefix.to_string();
                search.committed = prefix.to_string();
                KeyRange::prefix(decode_key(prefix, options.key_format))
            }
            _ => KeyRange::All,
        };

        let cursor = Cursor::open(&mut store, range)?;
        let mut session = Self {
            cursor,
            store,
            window: PageWindow::new(options.page_size),
            options,
            focus: Focus::List,
            selected: 0,
            value: None,
            value_scroll: 0,
            search,
        };
        session.restart()?;
        info!(
            path = %config.path.display(),
            rows = session.window.rows().len(),
            "session opened"
        );
        Ok(session)
    }

    pub fn rows(&self) -> &[Row] {
        self.window.rows()
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn selected_row(&self) -> Option<&Row> {
        self.window.rows().get(self.selected)
    }

    pub fn page_number(&self) -> usize {
        self.window.page_number()
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn options(&self) -> DisplayOptions {
        self.options
    }

    pub fn search_text(&self) -> &str {
        &self.search.text
    }

    pub fn search_error(&self) -> Option<&str> {
        self.search.error.as_deref()
    }

    pub fn value_scroll(&self) -> u16 {
        self.value_scroll
    }

    /// The selected row's value, rendered in the current value format.
    pub fn value_text(&self) -> String {
        self.value
            .as_deref()
            .map(|raw| encode_value(raw, self.options.value_format))
            .unwrap_or_default()
    }

    /// Human description of the range the cursor is scoped to.
    pub fn range_label(&self) -> String {
        match self.cursor.range() {
            KeyRange::All => "all keys".into(),
            KeyRange::Prefix(prefix) => {
                format!("prefix {}", encode_key(prefix, self.options.key_format))
            }
        }
    }

    /// Label and rendered value of every row in the window.
    pub fn listing(&mut self) -> Result<Vec<(String, String)>, SessionError> {
        let mut out = Vec::with_capacity(self.window.rows().len());
        for row in self.window.rows() {
            let value = self.store.get(&row.raw_key)?.unwrap_or_default();
            out.push((
                row.label.clone(),
                encode_value(&value, self.options.value_format),
            ));
        }
        Ok(out)
    }

    pub fn handle(&mut self, event: NavEvent) -> Result<(), SessionError> {
        match self.focus {
            Focus::List => self.handle_list(event),
            Focus::Value => {
                self.handle_value(event);
                Ok(())
            }
            Focus::Search => self.handle_search(event),
        }
    }

    /// Releases the iteration handle, then the store.
    pub fn close(self) -> Result<(), SessionError> {
        let Self {
            cursor, mut store, ..
        } = self;
        drop(cursor);
        store.close()?;
        debug!("session closed");
        Ok(())
    }

    fn handle_list(&mut self, event: NavEvent) -> Result<(), SessionError> {
        let count = self.window.rows().len();
        match event {
            NavEvent::Down if self.selected + 1 < count => self.select(self.selected + 1)?,
            NavEvent::Down | NavEvent::PageDown => self.page_forward()?,
            NavEvent::Up if self.selected > 0 => self.select(self.selected - 1)?,
            NavEvent::Up | NavEvent::PageUp => self.page_backward()?,
            NavEvent::Home => {
                self.cursor.seek_first()?;
                self.restart()?;
            }
            NavEvent::Enter if count > 0 => {
                self.select(self.selected)?;
                self.focus = Focus::Value;
            }
            NavEvent::FocusSearch => self.focus_search(),
            NavEvent::Enter | NavEvent::Back | NavEvent::Char(_) | NavEvent::Backspace => {}
        }
        Ok(())
    }

    fn handle_value(&mut self, event: NavEvent) {
        match event {
            NavEvent::Back | NavEvent::Enter => self.focus = Focus::List,
            NavEvent::Up => self.value_scroll = self.value_scroll.saturating_sub(1),
            NavEvent::Down => self.value_scroll = self.value_scroll.saturating_add(1),
            NavEvent::PageUp => {
                self.value_scroll = self.value_scroll.saturating_sub(VALUE_PAGE_LINES);
            }
            NavEvent::PageDown => {
                self.value_scroll = self.value_scroll.saturating_add(VALUE_PAGE_LINES);
            }
            NavEvent::Home => self.value_scroll = 0,
            NavEvent::FocusSearch => self.focus_search(),
            NavEvent::Char(_) | NavEvent::Backspace => {}
        }
    }

    fn handle_search(&mut self, event: NavEvent) -> Result<(), SessionError> {
        match event {
            NavEvent::Char(c) => {
                self.search.text.push(c);
                self.search.error = None;
            }
            NavEvent::Backspace => {
                self.search.text.pop();
                self.search.error = None;
            }
            NavEvent::Back => {
                self.search.text = self.search.committed.clone();
                self.search.error = None;
                self.focus = Focus::List;
            }
            NavEvent::Enter => self.confirm_search()?,
            NavEvent::Up
            | NavEvent::Down
            | NavEvent::PageUp
            | NavEvent::PageDown
            | NavEvent::Home
            | NavEvent::FocusSearch => {}
        }
        Ok(())
    }

    fn focus_search(&mut self) {
        self.search.error = None;
        self.focus = Focus::Search;
    }

    fn confirm_search(&mut self) -> Result<(), SessionError> {
        let input = self.search.text.clone();

        if let Some(parsed) = parse_directive(&input) {
            match parsed {
                Ok(directive) => {
                    self.apply_directive(directive);
                    self.search.text = self.search.committed.clone();
                }
                Err(err) => {
                    warn!(%input, %err, "rejected directive");
                    self.search.error = Some(err.to_string());
                    return Ok(());
                }
            }
        } else {
            if input.is_empty() {
                self.cursor.reseek_all(&mut self.store)?;
            } else {
                let prefix = decode_key(&input, self.options.key_format);
                self.cursor.reseek_prefix(&mut self.store, prefix)?;
            }
            self.restart()?;
            self.search.committed = input;
        }

        self.search.error = None;
        self.focus = Focus::List;
        Ok(())
    }

    fn apply_directive(&mut self, directive: Directive) {
        debug!(?directive, "applying directive");
        self.options.apply(directive);
        match directive {
            Directive::KeyFormat(format) => self.window.relabel(format),
            Directive::ValueFormat(_) => {}
            Directive::PageSize(size) => self.window.set_page_size(size),
        }
    }

    /// Shows the first page of the cursor's range; the cursor must be freshly seeked.
    fn restart(&mut self) -> Result<(), SessionError> {
        self.window.reset();
        self.window
            .fill_forward(&mut self.cursor, self.options.key_format)?;
        self.select(0)
    }

    fn page_forward(&mut self) -> Result<(), SessionError> {
        if self
            .window
            .fill_forward(&mut self.cursor, self.options.key_format)?
        {
            self.select(0)?;
        }
        Ok(())
    }

    fn page_backward(&mut self) -> Result<(), SessionError> {
        let Some(old_first) = self.window.rows().first().map(|row| row.raw_key.clone()) else {
            return Ok(());
        };
        if !self
            .window
            .fill_backward(&mut self.cursor, self.options.key_format)?
        {
            return Ok(());
        }

        // Land on the row just above where the previous page started.
        let rows = self.window.rows();
        let last = rows.len().saturating_sub(1);
        let index = rows
            .iter()
            .position(|row| row.raw_key == old_first)
            .map_or(last, |i| i.saturating_sub(1));
        self.select(index)
    }

    fn select(&mut self, index: usize) -> Result<(), SessionError> {
        self.selected = index;
        self.value_scroll = 0;
        self.value = match self.window.rows().get(index) {
            Some(row) => self.store.get(&row.raw_key)?,
            None => None,
        };
        Ok(())
    }
}

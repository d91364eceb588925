pub mod codec;
pub mod cursor;
pub mod mem;
pub mod options;
pub mod page;
pub mod session;
pub mod store;

pub use codec::{KeyFormat, ValueFormat, decode_key, encode_key, encode_value};
pub use cursor::{Cursor, CursorState, Step};
pub use mem::MemStore;
pub use options::{Directive, DirectiveError, DisplayOptions, StartupConfig, parse_page_size};
pub use page::{Direction, PageWindow, Row};
pub use session::{Focus, NavEvent, Session, SessionError};
pub use store::{KeyRange, KvStore, RawIter, StoreError};

//! Startup configuration, mutable display options and the `$name=value`
//! directives typed into the search box.

use std::path::PathBuf;

use crate::codec::{KeyFormat, UnknownFormat, ValueFormat};

pub const DEFAULT_PAGE_SIZE: usize = 100;

/// Marks search-box input as a directive rather than a key prefix.
pub const DIRECTIVE_MARKER: char = '$';

/// Everything the CLI layer hands to a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartupConfig {
    pub path: PathBuf,
    pub key_format: KeyFormat,
    pub value_format: ValueFormat,
    pub page_size: usize,
    /// Prefix search to run before the first page is shown, in key-format text.
    pub initial_prefix: Option<String>,
}

impl StartupConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            key_format: KeyFormat::default(),
            value_format: ValueFormat::default(),
            page_size: DEFAULT_PAGE_SIZE,
            initial_prefix: None,
        }
    }

    pub fn display_options(&self) -> DisplayOptions {
        DisplayOptions {
            key_format: self.key_format,
            value_format: self.value_format,
            page_size: self.page_size.max(1),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayOptions {
    pub key_format: KeyFormat,
    pub value_format: ValueFormat,
    pub page_size: usize,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            key_format: KeyFormat::default(),
            value_format: ValueFormat::default(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive {
    KeyFormat(KeyFormat),
    ValueFormat(ValueFormat),
    PageSize(usize),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DirectiveError {
    #[error("expected name=value")]
    Malformed,
    #[error("unknown setting `{0}` (try key, val or max)")]
    UnknownName(String),
    #[error("{0} for key (try text or hex)")]
    KeyFormat(UnknownFormat),
    #[error("{0} for val (try text, hex, number or binary)")]
    ValueFormat(UnknownFormat),
    #[error(transparent)]
    PageSize(#[from] PageSizeError),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("max must be a positive integer, got `{0}`")]
pub struct PageSizeError(pub String);

pub fn parse_page_size(input: &str) -> Result<usize, PageSizeError> {
    match input.trim().parse::<usize>() {
        Ok(size) if size > 0 => Ok(size),
        _ => Err(PageSizeError(input.trim().to_string())),
    }
}

/// Parses search-box input. Returns `None` when the input is not a directive.
pub fn parse_directive(input: &str) -> Option<Result<Directive, DirectiveError>> {
    let body = input.strip_prefix(DIRECTIVE_MARKER)?;
    Some(parse_directive_body(body))
}

fn parse_directive_body(body: &str) -> Result<Directive, DirectiveError> {
    let mut parts = body.split('=');
    let (Some(name), Some(value), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(DirectiveError::Malformed);
    };

    match name.trim() {
        "key" => value
            .parse()
            .map(Directive::KeyFormat)
            .map_err(DirectiveError::KeyFormat),
        "val" => value
            .parse()
            .map(Directive::ValueFormat)
            .map_err(DirectiveError::ValueFormat),
        "max" => Ok(Directive::PageSize(parse_page_size(value)?)),
        other => Err(DirectiveError::UnknownName(other.to_string())),
    }
}

impl DisplayOptions {
    pub fn apply(&mut self, directive: Directive) {
        match directive {
            Directive::KeyFormat(format) => self.key_format = format,
            Directive::ValueFormat(format) => self.value_format = format,
            Directive::PageSize(size) => self.page_size = size,
        }
    }
}

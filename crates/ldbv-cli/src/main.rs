mod app;
mod leveldb;
mod logging;
mod ui;

use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use ldbv_core::options::DEFAULT_PAGE_SIZE;
use ldbv_core::{KeyFormat, Session, StartupConfig, ValueFormat, parse_page_size};
use tracing::info;

use crate::leveldb::LevelDbStore;

#[derive(Debug, Parser)]
#[command(name = "ldbv", about = "Read-only terminal browser for LevelDB databases")]
struct Cli {
    /// LevelDB database directory
    #[arg(long)]
    db: PathBuf,

    /// How keys are shown and how search prefixes are read
    #[arg(long, value_enum, default_value_t = CliKeyFormat::Hex)]
    key_format: CliKeyFormat,

    /// How values are shown
    #[arg(long, value_enum, default_value_t = CliValueFormat::Hex)]
    value_format: CliValueFormat,

    /// Keys per page
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE, value_parser = parse_page_size)]
    max: usize,

    /// Start with a prefix search, written in the key format
    #[arg(long)]
    prefix: Option<String>,

    /// Write logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Color theme
    #[arg(long, value_enum, default_value_t = CliTheme::Default)]
    theme: CliTheme,

    /// Disable ANSI color
    #[arg(long, default_value_t = false)]
    no_color: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
enum CliKeyFormat {
    #[value(alias = "string")]
    Text,
    Hex,
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
enum CliValueFormat {
    #[value(alias = "string")]
    Text,
    Hex,
    #[value(alias = "decimal")]
    Number,
    Binary,
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
enum CliTheme {
    Default,
    HighContrast,
}

impl From<CliKeyFormat> for KeyFormat {
    fn from(value: CliKeyFormat) -> Self {
        match value {
            CliKeyFormat::Text => KeyFormat::Text,
            CliKeyFormat::Hex => KeyFormat::Hex,
        }
    }
}

impl From<CliValueFormat> for ValueFormat {
    fn from(value: CliValueFormat) -> Self {
        match value {
            CliValueFormat::Text => ValueFormat::Text,
            CliValueFormat::Hex => ValueFormat::Hex,
            CliValueFormat::Number => ValueFormat::Decimal,
            CliValueFormat::Binary => ValueFormat::Binary,
        }
    }
}

impl From<CliTheme> for app::ThemeChoice {
    fn from(value: CliTheme) -> Self {
        match value {
            CliTheme::Default => app::ThemeChoice::Default,
            CliTheme::HighContrast => app::ThemeChoice::HighContrast,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let force_tui = std::env::var("LDBV_FORCE_TUI").ok().as_deref() == Some("1");

    if !cli.db.exists() {
        bail!("database path {} does not exist", cli.db.display());
    }
    logging::init(cli.log_file.as_deref())?;

    let config = startup_config(&cli);
    let store = LevelDbStore::open(&cli.db)
        .with_context(|| format!("failed to open database {}", cli.db.display()))?;
    let mut session = Session::new(store, &config)?;

    if (!io::stdin().is_terminal() || !io::stdout().is_terminal()) && !force_tui {
        let rows = session.listing()?;
        print_listing(&rows)?;
        session.close()?;
        return Ok(());
    }

    let mut app = app::App::new(session, cli.db.clone());
    app.set_prefs(cli.theme.into(), cli.no_color);
    let result = app.run();
    let closed = app.into_session().close();
    result?;
    closed?;
    info!("session ended");
    Ok(())
}

fn startup_config(cli: &Cli) -> StartupConfig {
    StartupConfig {
        key_format: cli.key_format.into(),
        value_format: cli.value_format.into(),
        page_size: cli.max,
        initial_prefix: cli.prefix.clone(),
        ..StartupConfig::new(cli.db.clone())
    }
}

fn print_listing(rows: &[(String, String)]) -> io::Result<()> {
    let stdout = io::stdout();
    let lock = stdout.lock();
    print_listing_to(rows, io::BufWriter::new(lock))
}

fn print_listing_to<W: Write>(rows: &[(String, String)], mut out: W) -> io::Result<()> {
    for (label, value) in rows {
        writeln!(out, "{label}\t{value}")?;
    }
    out.flush()
}

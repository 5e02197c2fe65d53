use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{error, info, warn};

use crate::config::{Config, Mode};
use crate::db::{Database, HadithApi, Language, QuranApi};
use crate::reader::{HadithReader, QuranReader, Reader};
use crate::ui::{run_app, App};

#[derive(Parser, Debug)]
#[command(
    name = "islam-companion",
    version,
    about = "Terminal reader for Quran and Hadith databases"
)]
pub struct Cli {
    /// Config file (defaults to config.toml in the platform config directory).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Built-in path set to start from.
    #[arg(long, value_enum, global = true)]
    pub mode: Option<Mode>,

    /// Database file, overriding the configured one for the chosen reader.
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Language to read in, overriding the last used one.
    #[arg(long, global = true)]
    pub lang: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Read the Quran ruku by ruku.
    Quran,
    /// Read hadith by source, book and title.
    Hadith,
}

/// Load configuration, start logging, open the chosen reader and run the TUI.
pub fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref(), cli.mode).context("failed to load config")?;
    let _guard = crate::logging::init(&config)?;
    info!(mode = ?config.mode, command = ?cli.command, "starting reader");

    let result = open_reader(&cli, &config).and_then(|reader| {
        let mut app = App::new(reader);
        run_app(&mut app)
    });
    if let Err(err) = &result {
        error!(error = %format!("{err:#}"), "reader terminated");
    }
    result
}

/// Open the database for `cli.command` and restore the reader position.
pub fn open_reader(cli: &Cli, config: &Config) -> Result<Box<dyn Reader>> {
    let lang = cli.lang.as_deref();
    match cli.command {
        Command::Quran => {
            let path = cli.db.clone().unwrap_or_else(|| config.quran_db.clone());
            let db = Database::open(&path)?;
            let api = QuranApi::new(db, &config.default_lang)?;
            Ok(Box::new(QuranReader::open(api, lang)?))
        }
        Command::Hadith => {
            let path = cli.db.clone().unwrap_or_else(|| config.hadith_db.clone());
            let db = Database::open(&path)?;
            let default_lang = config.default_lang.parse::<Language>().unwrap_or_else(|err| {
                warn!(error = %err, "default language not available, using Urdu");
                Language::default()
            });
            let lang = lang.map(str::parse::<Language>).transpose()?;
            let api = HadithApi::new(db, default_lang);
            Ok(Box::new(HadithReader::open(api, lang)?))
        }
    }
}

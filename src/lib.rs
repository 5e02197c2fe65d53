//! Reader for Quran and Hadith texts stored in local SQLite databases.
//!
//! The `db` layer turns parameterized queries into plain models, `navigation`
//! walks the nested listings with wraparound, and the `reader` controllers
//! tie the two together for the terminal front-end in `ui`.
pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod models;
pub mod navigation;
pub mod reader;
pub mod ui;

pub use config::{Config, Mode};
pub use db::{Database, HadithApi, Language, QuranApi};
pub use error::{ConfigError, DbError, DbResult};
pub use models::{AyatRange, Book, HadithLocation, RukuRef, Settings, Sura, Title};
pub use reader::{HadithReader, QuranReader, Reader};
pub use ui::{run_app, App};

//! Persistence module split across logical submodules.

mod connection;
pub mod hadith;
pub mod quran;

pub use connection::Database;
pub use hadith::{HadithApi, Language};
pub use quran::QuranApi;

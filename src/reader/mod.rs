//! Reader controllers. They keep the current selection at every level of the
//! hierarchy, answer next/previous/random requests and persist the last
//! viewed position. Nothing in here knows about the terminal.

mod hadith;
mod quran;

pub use hadith::HadithReader;
pub use quran::QuranReader;

use tracing::warn;

use crate::error::{DbError, DbResult};

/// One selectable level, e.g. the list of books of the current source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Level {
    pub label: &'static str,
    /// Key that opens the picker for this level.
    pub key: char,
    pub items: Vec<String>,
    pub selected: Option<usize>,
}

impl Level {
    pub fn current(&self) -> Option<&str> {
        self.selected
            .and_then(|idx| self.items.get(idx))
            .map(String::as_str)
    }
}

/// A block of text in the reading pane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Passage {
    pub heading: Option<String>,
    pub text: String,
    pub caption: Option<String>,
}

/// The operations the terminal front-end drives, shared by both readers.
pub trait Reader {
    fn name(&self) -> &'static str;
    fn levels(&self) -> Vec<Level>;
    fn select(&mut self, level: usize, index: usize) -> DbResult<()>;
    fn next(&mut self) -> DbResult<()>;
    fn prev(&mut self) -> DbResult<()>;
    fn random(&mut self) -> DbResult<()>;
    fn language(&self) -> String;
    fn languages(&self) -> DbResult<Vec<String>>;
    fn set_language(&mut self, lang: &str) -> DbResult<()>;
    fn passages(&self) -> Vec<Passage>;
    fn is_rtl(&self) -> bool;
    /// Short description of where the reader is, for the status line.
    fn position_label(&self) -> String;
}

/// Turn lookups that legitimately miss (stale settings row, unknown
/// language) into `None`; real query failures still propagate.
fn tolerate_missing<T>(result: DbResult<T>, what: &str) -> DbResult<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(err @ (DbError::NotFound { .. } | DbError::UnknownLanguage(_))) => {
            warn!(%err, "{what} unavailable");
            Ok(None)
        }
        Err(err) => Err(err),
    }
}

//! Plain data holders that mirror rows in the hadith and Quran databases.
//! Nothing here talks to SQLite; the `db` layer hydrates these and the
//! `reader` controllers pass them to the UI.

use std::fmt;

/// A hadith book as listed for a single source. `id` is the key titles
/// reference through `book_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Book {
    pub id: i64,
    pub name: String,
}

impl fmt::Display for Book {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// A single hadith heading. The id doubles as the hadith text id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Title {
    pub id: i64,
    pub title: String,
}

impl fmt::Display for Title {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title)
    }
}

/// Where a hadith lives in the source → book → title hierarchy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HadithLocation {
    pub source: String,
    pub book_id: i64,
    pub title_id: i64,
}

/// A sura entry from `ic_quranic_suras_meta`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sura {
    /// 1-based sura index.
    pub number: i64,
    /// Transliterated name, used in ayat captions.
    pub tname: String,
    /// English name.
    pub ename: String,
}

impl fmt::Display for Sura {
    /// Renders as `tname (ename)`, the label used in the sura picker.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.tname, self.ename)
    }
}

/// First and last `sura_ayat_id` of a ruku, both inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AyatRange {
    pub start: i64,
    pub end: i64,
}

impl AyatRange {
    pub fn len(&self) -> usize {
        (self.end - self.start + 1).max(0) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for AyatRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ayas {} - {}", self.start, self.end)
    }
}

/// A ruku addressed by sura number and its 1-based position inside the sura.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RukuRef {
    pub sura: i64,
    pub ruku: i64,
}

/// The single settings row each database keeps for the last viewed position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub language: String,
    pub row_id: i64,
}

use std::fmt;
use std::str::FromStr;

use rusqlite::params;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::models::{Book, HadithLocation, Settings, Title};

use super::connection::Database;

/// Languages the hadith database ships text for. Each one maps to a fixed
/// pair of tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    #[default]
    Urdu,
    English,
    Arabic,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::Urdu, Language::English, Language::Arabic];

    pub fn name(self) -> &'static str {
        match self {
            Language::Urdu => "Urdu",
            Language::English => "English",
            Language::Arabic => "Arabic",
        }
    }

    pub fn text_table(self) -> &'static str {
        match self {
            Language::Urdu => "ic_hadith_urdu",
            Language::English => "ic_hadith_english",
            Language::Arabic => "ic_hadith_arabic",
        }
    }

    pub fn books_table(self) -> &'static str {
        match self {
            Language::Urdu => "ic_hadith_books_urdu",
            Language::English => "ic_hadith_books_english",
            Language::Arabic => "ic_hadith_books_arabic",
        }
    }

    pub fn is_rtl(self) -> bool {
        matches!(self, Language::Urdu | Language::Arabic)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Language {
    type Err = DbError;

    /// Accepts the display name or the two-letter code, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "urdu" | "ur" => Ok(Language::Urdu),
            "english" | "en" => Ok(Language::English),
            "arabic" | "ar" => Ok(Language::Arabic),
            _ => Err(DbError::UnknownLanguage(s.to_string())),
        }
    }
}

/// Read access to the hadith database plus its single settings row.
pub struct HadithApi {
    db: Database,
    lang: Language,
}

impl HadithApi {
    pub fn new(db: Database, lang: Language) -> Self {
        Self { db, lang }
    }

    pub fn lang(&self) -> Language {
        self.lang
    }

    /// Switch the text and book tables used by every subsequent query.
    pub fn set_lang(&mut self, lang: Language) {
        info!(language = %lang, "hadith language changed");
        self.lang = lang;
    }

    pub fn tbl_text(&self) -> &'static str {
        self.lang.text_table()
    }

    pub fn tbl_books(&self) -> &'static str {
        self.lang.books_table()
    }

    /// Distinct sources in the order they first appear in the books table.
    pub fn get_source_list(&self) -> DbResult<Vec<String>> {
        let sql = format!(
            "SELECT source FROM {} GROUP BY source ORDER BY MIN(id) ASC",
            self.tbl_books()
        );
        self.db.fetch(&sql, [], |row| row.get(0))
    }

    /// Books of one source ordered by their book number.
    pub fn get_book_list(&self, source: &str) -> DbResult<Vec<Book>> {
        let sql = format!(
            "SELECT id, book FROM {} WHERE source = ?1 ORDER BY book_number ASC",
            self.tbl_books()
        );
        self.db.fetch(&sql, [source], |row| {
            Ok(Book {
                id: row.get(0)?,
                name: row.get(1)?,
            })
        })
    }

    pub fn get_title_list(&self, book_id: i64) -> DbResult<Vec<Title>> {
        let sql = format!(
            "SELECT id, title FROM {} WHERE book_id = ?1 ORDER BY id ASC",
            self.tbl_text()
        );
        self.db.fetch(&sql, [book_id], |row| {
            Ok(Title {
                id: row.get(0)?,
                title: row.get(1)?,
            })
        })
    }

    pub fn get_hadith_text(&self, hadith_id: i64) -> DbResult<String> {
        let sql = format!("SELECT hadith_text FROM {} WHERE id = ?1", self.tbl_text());
        self.db.fetch_one(&sql, [hadith_id], |row| row.get(0))
    }

    /// Resolve a hadith id to its source, book and title.
    pub fn get_row(&self, hadith_id: i64) -> DbResult<HadithLocation> {
        let sql = format!(
            "SELECT b.source, b.id, t.id
             FROM {} t INNER JOIN {} b ON b.id = t.book_id
             WHERE t.id = ?1",
            self.tbl_text(),
            self.tbl_books()
        );
        self.db.fetch_one(&sql, [hadith_id], |row| {
            Ok(HadithLocation {
                source: row.get(0)?,
                book_id: row.get(1)?,
                title_id: row.get(2)?,
            })
        })
    }

    pub fn load_settings(&self) -> DbResult<Settings> {
        self.db.fetch_one(
            "SELECT language, row_id FROM ic_hadith_settings",
            [],
            |row| {
                Ok(Settings {
                    language: row.get(0)?,
                    row_id: row.get(1)?,
                })
            },
        )
    }

    /// Record the last viewed hadith. The table holds exactly one row.
    pub fn update_settings(&self, lang: Language, hadith_id: i64) -> DbResult<()> {
        let changed = self.db.execute(
            "UPDATE ic_hadith_settings SET language = ?1, row_id = ?2",
            params![lang.name(), hadith_id],
        )?;
        debug!(language = %lang, hadith_id, changed, "hadith settings saved");
        Ok(())
    }
}

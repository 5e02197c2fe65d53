use rusqlite::params;
use tracing::{debug, info, warn};

use crate::error::{DbError, DbResult};
use crate::models::{AyatRange, RukuRef, Settings, Sura};

use super::connection::{quote_identifier, Database};

/// Read access to the Quran database. Translations live in one table per
/// language; the table name is looked up in `ic_quranic_tbl_meta_data`.
pub struct QuranApi {
    db: Database,
    lang: String,
    tbl: String,
}

impl QuranApi {
    /// Wrap the database and select the text table for `lang`. When the
    /// database has no such language the first listed one is used instead;
    /// only a database without any translation is an error.
    pub fn new(db: Database, lang: &str) -> DbResult<Self> {
        let mut api = Self {
            db,
            lang: String::new(),
            tbl: String::new(),
        };
        match api.set_lang(lang) {
            Err(DbError::UnknownLanguage(_)) => {
                let Some(fallback) = api.get_lang_list()?.into_iter().next() else {
                    return Err(DbError::UnknownLanguage(lang.to_string()));
                };
                warn!(requested = lang, fallback = %fallback, "default language not in database");
                api.set_lang(&fallback)?;
            }
            result => result?,
        }
        Ok(api)
    }

    pub fn lang(&self) -> &str {
        &self.lang
    }

    /// Name of the text table for the current language.
    pub fn tbl(&self) -> &str {
        &self.tbl
    }

    pub fn set_lang(&mut self, lang: &str) -> DbResult<()> {
        let tbl = self.get_db_tbl_name(lang)?;
        info!(language = lang, table = %tbl, "quran language changed");
        self.lang = lang.to_string();
        self.tbl = tbl;
        Ok(())
    }

    pub fn get_lang_list(&self) -> DbResult<Vec<String>> {
        self.db.fetch(
            "SELECT language FROM ic_quranic_tbl_meta_data ORDER BY language ASC",
            [],
            |row| row.get(0),
        )
    }

    pub fn is_rtl(&self, lang: &str) -> DbResult<bool> {
        self.db
            .fetch_one(
                "SELECT rtl FROM ic_quranic_tbl_meta_data WHERE language = ?1",
                [lang],
                |row| row.get::<_, i64>(0),
            )
            .map(|rtl| rtl != 0)
    }

    fn get_db_tbl_name(&self, lang: &str) -> DbResult<String> {
        self.db
            .fetch_one(
                "SELECT tbl_name FROM ic_quranic_tbl_meta_data WHERE language = ?1",
                [lang],
                |row| row.get(0),
            )
            .map_err(|err| match err {
                DbError::NotFound { .. } => DbError::UnknownLanguage(lang.to_string()),
                other => other,
            })
    }

    pub fn get_sura_names(&self) -> DbResult<Vec<Sura>> {
        self.db.fetch(
            "SELECT sindex, tname, ename FROM ic_quranic_suras_meta ORDER BY sindex ASC",
            [],
            |row| {
                Ok(Sura {
                    number: row.get(0)?,
                    tname: row.get(1)?,
                    ename: row.get(2)?,
                })
            },
        )
    }

    pub fn get_ruku_count(&self, sura: i64) -> DbResult<i64> {
        self.db.fetch_one(
            "SELECT rukus FROM ic_quranic_suras_meta WHERE sindex = ?1",
            [sura],
            |row| row.get(0),
        )
    }

    /// First and last ayat of a ruku, taken in meta-data id order.
    pub fn get_ayat_range(&self, sura: i64, ruku: i64) -> DbResult<AyatRange> {
        let start = self.db.fetch_one(
            "SELECT sura_ayat_id FROM ic_quranic_meta_data
             WHERE sura = ?1 AND sura_ruku = ?2 ORDER BY id ASC LIMIT 1",
            [sura, ruku],
            |row| row.get(0),
        )?;
        let end = self.db.fetch_one(
            "SELECT sura_ayat_id FROM ic_quranic_meta_data
             WHERE sura = ?1 AND sura_ruku = ?2 ORDER BY id DESC LIMIT 1",
            [sura, ruku],
            |row| row.get(0),
        )?;
        Ok(AyatRange { start, end })
    }

    /// Translated text of every ayat in the ruku, in ayat order.
    pub fn get_ayat_text(&self, sura: i64, ruku: i64) -> DbResult<Vec<String>> {
        let range = self.get_ayat_range(sura, ruku)?;
        let sql = format!(
            "SELECT translated_text FROM {}
             WHERE sura = ?1 AND sura_ayat_id >= ?2 AND sura_ayat_id <= ?3
             ORDER BY sura_ayat_id ASC",
            quote_identifier(&self.tbl)
        );
        self.db.fetch(&sql, [sura, range.start, range.end], |row| row.get(0))
    }

    /// Pick a ruku uniformly at random across the whole Quran. Every ruku is
    /// equally likely, whatever its ayat count; the desktop reader drew a
    /// random ayat row instead, which favoured long rukus.
    pub fn get_random_ruku(&self) -> DbResult<RukuRef> {
        let ruku = self.db.fetch_one(
            "SELECT sura, sura_ruku FROM
               (SELECT DISTINCT sura, sura_ruku FROM ic_quranic_meta_data)
             ORDER BY random() LIMIT 1",
            [],
            |row| {
                Ok(RukuRef {
                    sura: row.get(0)?,
                    ruku: row.get(1)?,
                })
            },
        )?;
        debug!(sura = ruku.sura, ruku = ruku.ruku, "picked random ruku");
        Ok(ruku)
    }

    /// Map a meta-data row id back to its sura and ruku.
    pub fn get_row(&self, row_id: i64) -> DbResult<RukuRef> {
        self.db.fetch_one(
            "SELECT sura, sura_ruku FROM ic_quranic_meta_data WHERE id = ?1",
            [row_id],
            |row| {
                Ok(RukuRef {
                    sura: row.get(0)?,
                    ruku: row.get(1)?,
                })
            },
        )
    }

    pub fn load_settings(&self) -> DbResult<Settings> {
        self.db.fetch_one(
            "SELECT language, row_id FROM ic_quranic_settings",
            [],
            |row| {
                Ok(Settings {
                    language: row.get(0)?,
                    row_id: row.get(1)?,
                })
            },
        )
    }

    /// Store the language and the text row of the first ayat on screen.
    pub fn update_settings(&self, lang: &str, sura: i64, ayat_id: i64) -> DbResult<()> {
        let sql = format!(
            "SELECT id FROM {} WHERE sura = ?1 AND sura_ayat_id = ?2",
            quote_identifier(&self.tbl)
        );
        let row_id: i64 = self.db.fetch_one(&sql, [sura, ayat_id], |row| row.get(0))?;
        self.db.execute(
            "UPDATE ic_quranic_settings SET language = ?1, row_id = ?2",
            params![lang, row_id],
        )?;
        debug!(language = lang, sura, ayat_id, row_id, "quran settings saved");
        Ok(())
    }
}

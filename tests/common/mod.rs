//! Small on-disk fixtures shaped like the shipped hadith and Quran databases.
#![allow(dead_code)]

use std::path::{Path, PathBuf};

use rusqlite::{params, Connection};

/// `(id, source, book, book_number)`. Sahih Muslim's ids deliberately run
/// against its book numbers.
pub const BOOKS: &[(i64, &str, &str, i64)] = &[
    (1, "Sahih Bukhari", "Revelation", 1),
    (2, "Sahih Bukhari", "Belief", 2),
    (3, "Sahih Muslim", "Purification", 2),
    (4, "Sahih Muslim", "Faith", 1),
];

/// `(id, book_id, title)`.
pub const TITLES: &[(i64, i64, &str)] = &[
    (1, 1, "How the revelation began"),
    (2, 1, "The first revelation"),
    (3, 1, "The night journey"),
    (4, 2, "Faith and deeds"),
    (5, 2, "Love of the Prophet"),
    (6, 3, "Wudu"),
    (7, 4, "Pillars of Islam"),
    (8, 4, "Angel Jibreel"),
];

/// Hadith ids in reading order: sources in first-appearance order, books by
/// book number, titles by id.
pub const HADITH_ORDER: &[i64] = &[1, 2, 3, 4, 5, 7, 8, 6];

/// `(sindex, tname, ename, ruku ayat counts)`.
pub const SURAS: &[(i64, &str, &str, &[i64])] = &[
    (1, "Al-Faatiha", "The Opening", &[7]),
    (2, "Al-Baqara", "The Cow", &[7, 5, 3]),
    (3, "Aal-i-Imraan", "The Family of Imraan", &[3, 3]),
];

pub const QURAN_LANGUAGES: &[(&str, &str, i64)] = &[
    ("English", "ic_quranic_text-en", 0),
    ("Urdu", "ic_quranic_text-ur", 1),
];

pub fn hadith_text(lang: &str, id: i64) -> String {
    format!("{lang} hadith number {id}")
}

pub fn ayat_text(table: &str, sura: i64, ayat: i64) -> String {
    format!("{table} {sura}:{ayat}")
}

/// Write a hadith database with all three language tables and a settings
/// row pointing at `settings_row`.
pub fn hadith_db(dir: &Path, settings: Option<(&str, i64)>) -> PathBuf {
    let path = dir.join("hadith.db");
    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(
        "CREATE TABLE ic_hadith_settings (language TEXT NOT NULL, row_id INTEGER NOT NULL);",
    )
    .unwrap();
    for lang in ["urdu", "english", "arabic"] {
        conn.execute_batch(&format!(
            "CREATE TABLE ic_hadith_books_{lang} (
                id INTEGER PRIMARY KEY, source TEXT, book TEXT, book_number INTEGER);
             CREATE TABLE ic_hadith_{lang} (
                id INTEGER PRIMARY KEY, book_id INTEGER, title TEXT, hadith_text TEXT);"
        ))
        .unwrap();
        for (id, source, book, number) in BOOKS {
            conn.execute(
                &format!("INSERT INTO ic_hadith_books_{lang} VALUES (?1, ?2, ?3, ?4)"),
                params![id, source, book, number],
            )
            .unwrap();
        }
        for (id, book_id, title) in TITLES {
            conn.execute(
                &format!("INSERT INTO ic_hadith_{lang} VALUES (?1, ?2, ?3, ?4)"),
                params![id, book_id, title, hadith_text(lang, *id)],
            )
            .unwrap();
        }
    }
    if let Some((lang, row_id)) = settings {
        conn.execute(
            "INSERT INTO ic_hadith_settings VALUES (?1, ?2)",
            params![lang, row_id],
        )
        .unwrap();
    }
    path
}

/// Write a Quran database with English and Urdu text tables.
pub fn quran_db(dir: &Path, settings: Option<(&str, i64)>) -> PathBuf {
    let path = dir.join("quran.db");
    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(
        "CREATE TABLE ic_quranic_tbl_meta_data (
            language TEXT, tbl_name TEXT, rtl INTEGER, font_family TEXT, font_size INTEGER);
         CREATE TABLE ic_quranic_suras_meta (
            sindex INTEGER PRIMARY KEY, tname TEXT, ename TEXT, rukus INTEGER);
         CREATE TABLE ic_quranic_meta_data (
            id INTEGER PRIMARY KEY, sura INTEGER, sura_ayat_id INTEGER, sura_ruku INTEGER);
         CREATE TABLE ic_quranic_settings (language TEXT NOT NULL, row_id INTEGER NOT NULL);",
    )
    .unwrap();

    for (language, table, rtl) in QURAN_LANGUAGES {
        conn.execute(
            "INSERT INTO ic_quranic_tbl_meta_data VALUES (?1, ?2, ?3, 'Sans Serif', 12)",
            params![language, table, rtl],
        )
        .unwrap();
        conn.execute_batch(&format!(
            "CREATE TABLE \"{table}\" (
                id INTEGER PRIMARY KEY, sura INTEGER, sura_ayat_id INTEGER, translated_text TEXT);"
        ))
        .unwrap();
    }

    let mut row_id = 0;
    for (sindex, tname, ename, rukus) in SURAS {
        conn.execute(
            "INSERT INTO ic_quranic_suras_meta VALUES (?1, ?2, ?3, ?4)",
            params![sindex, tname, ename, rukus.len() as i64],
        )
        .unwrap();
        let mut ayat = 0;
        for (ruku_idx, ayat_count) in rukus.iter().enumerate() {
            for _ in 0..*ayat_count {
                ayat += 1;
                row_id += 1;
                conn.execute(
                    "INSERT INTO ic_quranic_meta_data VALUES (?1, ?2, ?3, ?4)",
                    params![row_id, sindex, ayat, ruku_idx as i64 + 1],
                )
                .unwrap();
                for (_, table, _) in QURAN_LANGUAGES {
                    conn.execute(
                        &format!("INSERT INTO \"{table}\" VALUES (?1, ?2, ?3, ?4)"),
                        params![row_id, sindex, ayat, ayat_text(table, *sindex, ayat)],
                    )
                    .unwrap();
                }
            }
        }
    }

    if let Some((lang, row_id)) = settings {
        conn.execute(
            "INSERT INTO ic_quranic_settings VALUES (?1, ?2)",
            params![lang, row_id],
        )
        .unwrap();
    }
    path
}

pub fn stored_settings(path: &Path, table: &str) -> (String, i64) {
    let conn = Connection::open(path).unwrap();
    conn.query_row(
        &format!("SELECT language, row_id FROM {table}"),
        [],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )
    .unwrap()
}

use std::collections::HashMap;

use rand::Rng;
use tracing::{debug, info};

use crate::db::{HadithApi, Language};
use crate::error::{DbError, DbResult};
use crate::models::{Book, Title};
use crate::navigation::{self, Hierarchy};

use super::{tolerate_missing, Level, Passage, Reader};

const DEPTH: usize = 3;

/// Source → book → title view over the hadith tables, with lazily fetched
/// book lists and title counts.
struct HadithTree<'a> {
    api: &'a HadithApi,
    sources: &'a [String],
    books: HashMap<usize, Vec<Book>>,
    titles: HashMap<(usize, usize), usize>,
}

impl<'a> HadithTree<'a> {
    fn new(api: &'a HadithApi, sources: &'a [String]) -> Self {
        Self {
            api,
            sources,
            books: HashMap::new(),
            titles: HashMap::new(),
        }
    }

    fn books(&mut self, source: usize) -> DbResult<&[Book]> {
        if !self.books.contains_key(&source) {
            let books = match self.sources.get(source) {
                Some(name) => self.api.get_book_list(name)?,
                None => Vec::new(),
            };
            self.books.insert(source, books);
        }
        Ok(self.books.get(&source).map(Vec::as_slice).unwrap_or(&[]))
    }
}

impl Hierarchy for HadithTree<'_> {
    type Error = DbError;

    fn count(&mut self, path: &[usize]) -> DbResult<usize> {
        match path {
            [] => Ok(self.sources.len()),
            &[source] => Ok(self.books(source)?.len()),
            &[source, book] => {
                if let Some(count) = self.titles.get(&(source, book)) {
                    return Ok(*count);
                }
                let book_id = self.books(source)?.get(book).map(|b| b.id);
                let count = match book_id {
                    Some(id) => self.api.get_title_list(id)?.len(),
                    None => 0,
                };
                self.titles.insert((source, book), count);
                Ok(count)
            }
            _ => Ok(0),
        }
    }
}

/// Controller for the hadith reader. It mirrors what the three combo boxes
/// of the desktop reader held: the lists at each level and the selected
/// index in each.
pub struct HadithReader {
    api: HadithApi,
    sources: Vec<String>,
    books: Vec<Book>,
    titles: Vec<Title>,
    source_idx: usize,
    book_idx: usize,
    title_idx: usize,
    text: String,
}

impl HadithReader {
    /// Load the source list and restore the last viewed hadith from the
    /// settings row. `lang` overrides the stored language.
    pub fn open(api: HadithApi, lang: Option<Language>) -> DbResult<Self> {
        let mut reader = Self {
            api,
            sources: Vec::new(),
            books: Vec::new(),
            titles: Vec::new(),
            source_idx: 0,
            book_idx: 0,
            title_idx: 0,
            text: String::new(),
        };

        let settings = tolerate_missing(reader.api.load_settings(), "hadith settings")?;
        if let Some(stored) = &settings {
            if let Some(stored_lang) =
                tolerate_missing(stored.language.parse::<Language>(), "stored language")?
            {
                reader.api.set_lang(stored_lang);
            }
        }
        if let Some(lang) = lang {
            reader.api.set_lang(lang);
        }

        reader.sources = reader.api.get_source_list()?;
        let restored = match settings {
            Some(stored) => reader.goto_hadith(stored.row_id)?,
            None => false,
        };
        if !restored {
            reader.goto_first()?;
        }
        info!(
            language = %reader.api.lang(),
            sources = reader.sources.len(),
            hadith = ?reader.current_id(),
            "hadith reader ready"
        );
        Ok(reader)
    }

    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    pub fn books(&self) -> &[Book] {
        &self.books
    }

    pub fn titles(&self) -> &[Title] {
        &self.titles
    }

    pub fn current_source(&self) -> Option<&str> {
        self.sources.get(self.source_idx).map(String::as_str)
    }

    pub fn current_book(&self) -> Option<&Book> {
        self.books.get(self.book_idx)
    }

    pub fn current_title(&self) -> Option<&Title> {
        self.titles.get(self.title_idx)
    }

    /// Id of the hadith on screen, if any.
    pub fn current_id(&self) -> Option<i64> {
        self.current_title().map(|title| title.id)
    }

    pub fn current_text(&self) -> &str {
        &self.text
    }

    /// Heading shown above the hadith text.
    pub fn caption(&self) -> &str {
        self.current_title().map_or("", |title| title.title.as_str())
    }

    pub fn api(&self) -> &HadithApi {
        &self.api
    }

    pub fn select_source(&mut self, index: usize) -> DbResult<()> {
        self.load_position(index, 0, 0)?;
        self.save_settings()
    }

    pub fn select_book(&mut self, index: usize) -> DbResult<()> {
        self.load_position(self.source_idx, index, 0)?;
        self.save_settings()
    }

    pub fn select_title(&mut self, index: usize) -> DbResult<()> {
        self.load_position(self.source_idx, self.book_idx, index)?;
        self.save_settings()
    }

    pub fn next_hadith(&mut self) -> DbResult<()> {
        let target = {
            let mut tree = HadithTree::new(&self.api, &self.sources);
            navigation::next(&mut tree, &self.position())?
        };
        self.apply(target)
    }

    pub fn prev_hadith(&mut self) -> DbResult<()> {
        let target = {
            let mut tree = HadithTree::new(&self.api, &self.sources);
            navigation::prev(&mut tree, &self.position())?
        };
        self.apply(target)
    }

    pub fn random_hadith<R: Rng>(&mut self, rng: &mut R) -> DbResult<()> {
        let target = {
            let mut tree = HadithTree::new(&self.api, &self.sources);
            navigation::random(&mut tree, DEPTH, rng)?
        };
        self.apply(target)
    }

    /// Switch language and try to stay on the same hadith.
    pub fn change_language(&mut self, lang: Language) -> DbResult<()> {
        let current = self.current_id();
        self.api.set_lang(lang);
        self.sources = self.api.get_source_list()?;
        let restored = match current {
            Some(id) => self.goto_hadith(id)?,
            None => false,
        };
        if !restored {
            self.goto_first()?;
        }
        self.save_settings()
    }

    fn position(&self) -> [usize; DEPTH] {
        [self.source_idx, self.book_idx, self.title_idx]
    }

    fn apply(&mut self, target: Option<Vec<usize>>) -> DbResult<()> {
        match target.as_deref() {
            Some(&[source, book, title]) => {
                self.load_position(source, book, title)?;
                self.save_settings()
            }
            _ => {
                debug!("no hadith to move to");
                Ok(())
            }
        }
    }

    fn goto_first(&mut self) -> DbResult<()> {
        let first = {
            let mut tree = HadithTree::new(&self.api, &self.sources);
            navigation::first(&mut tree, DEPTH)?
        };
        match first.as_deref() {
            Some(&[source, book, title]) => self.load_position(source, book, title),
            _ => self.load_position(0, 0, 0),
        }
    }

    /// Position the reader on a hadith id. Returns `false` when the id does
    /// not resolve in the current language tables.
    fn goto_hadith(&mut self, hadith_id: i64) -> DbResult<bool> {
        let Some(location) = tolerate_missing(self.api.get_row(hadith_id), "hadith location")?
        else {
            return Ok(false);
        };
        let Some(source) = self.sources.iter().position(|s| *s == location.source) else {
            return Ok(false);
        };
        let books = self.api.get_book_list(&location.source)?;
        let Some(book) = books.iter().position(|b| b.id == location.book_id) else {
            return Ok(false);
        };
        let titles = self.api.get_title_list(location.book_id)?;
        let Some(title) = titles.iter().position(|t| t.id == location.title_id) else {
            return Ok(false);
        };
        self.load_position(source, book, title)?;
        Ok(true)
    }

    /// Refill the book and title lists for the given indexes and fetch the
    /// hadith text. Out-of-range indexes are clamped.
    fn load_position(&mut self, source: usize, book: usize, title: usize) -> DbResult<()> {
        self.source_idx = source.min(self.sources.len().saturating_sub(1));
        self.books = match self.sources.get(self.source_idx) {
            Some(name) => self.api.get_book_list(name)?,
            None => Vec::new(),
        };
        self.book_idx = book.min(self.books.len().saturating_sub(1));
        self.titles = match self.books.get(self.book_idx) {
            Some(book) => self.api.get_title_list(book.id)?,
            None => Vec::new(),
        };
        self.title_idx = title.min(self.titles.len().saturating_sub(1));
        self.text = match self.current_id() {
            Some(id) => self.api.get_hadith_text(id)?,
            None => String::new(),
        };
        debug!(
            source = self.source_idx,
            book = self.book_idx,
            title = self.title_idx,
            "hadith position loaded"
        );
        Ok(())
    }

    fn save_settings(&self) -> DbResult<()> {
        match self.current_id() {
            Some(id) => self.api.update_settings(self.api.lang(), id),
            None => Ok(()),
        }
    }
}

impl Reader for HadithReader {
    fn name(&self) -> &'static str {
        "Hadith Reader"
    }

    fn levels(&self) -> Vec<Level> {
        let selected = |len: usize, idx: usize| (len > 0).then_some(idx);
        vec![
            Level {
                label: "Source",
                key: 's',
                items: self.sources.clone(),
                selected: selected(self.sources.len(), self.source_idx),
            },
            Level {
                label: "Book",
                key: 'b',
                items: self.books.iter().map(ToString::to_string).collect(),
                selected: selected(self.books.len(), self.book_idx),
            },
            Level {
                label: "Title",
                key: 't',
                items: self.titles.iter().map(ToString::to_string).collect(),
                selected: selected(self.titles.len(), self.title_idx),
            },
        ]
    }

    fn select(&mut self, level: usize, index: usize) -> DbResult<()> {
        match level {
            0 => self.select_source(index),
            1 => self.select_book(index),
            _ => self.select_title(index),
        }
    }

    fn next(&mut self) -> DbResult<()> {
        self.next_hadith()
    }

    fn prev(&mut self) -> DbResult<()> {
        self.prev_hadith()
    }

    fn random(&mut self) -> DbResult<()> {
        self.random_hadith(&mut rand::thread_rng())
    }

    fn language(&self) -> String {
        self.api.lang().to_string()
    }

    fn languages(&self) -> DbResult<Vec<String>> {
        Ok(Language::ALL.iter().map(ToString::to_string).collect())
    }

    fn set_language(&mut self, lang: &str) -> DbResult<()> {
        self.change_language(lang.parse()?)
    }

    fn passages(&self) -> Vec<Passage> {
        if self.current_title().is_none() {
            return Vec::new();
        }
        vec![Passage {
            heading: Some(self.caption().to_string()),
            text: self.text.clone(),
            caption: None,
        }]
    }

    fn is_rtl(&self) -> bool {
        self.api.lang().is_rtl()
    }

    fn position_label(&self) -> String {
        match (self.current_source(), self.current_book()) {
            (Some(source), Some(book)) => format!(
                "{source} / {book} / {}/{}",
                self.title_idx + 1,
                self.titles.len()
            ),
            _ => "No hadith loaded".to_string(),
        }
    }
}

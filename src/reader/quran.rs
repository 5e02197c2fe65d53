use std::collections::HashMap;

use tracing::{debug, info};

use crate::db::QuranApi;
use crate::error::{DbError, DbResult};
use crate::models::{AyatRange, RukuRef, Sura};
use crate::navigation::{self, Hierarchy};

use super::{tolerate_missing, Level, Passage, Reader};

const DEPTH: usize = 2;

/// Sura → ruku view with memoized ruku counts.
struct QuranTree<'a> {
    api: &'a QuranApi,
    suras: &'a [Sura],
    rukus: HashMap<usize, usize>,
}

impl Hierarchy for QuranTree<'_> {
    type Error = DbError;

    fn count(&mut self, path: &[usize]) -> DbResult<usize> {
        match path {
            [] => Ok(self.suras.len()),
            &[sura] => {
                if let Some(count) = self.rukus.get(&sura) {
                    return Ok(*count);
                }
                let count = match self.suras.get(sura) {
                    Some(s) => self.api.get_ruku_count(s.number)?.max(0) as usize,
                    None => 0,
                };
                self.rukus.insert(sura, count);
                Ok(count)
            }
            _ => Ok(0),
        }
    }
}

/// Controller for the Quran reader: selected sura and ruku, the ayat range
/// of that ruku and the translated ayat text.
pub struct QuranReader {
    api: QuranApi,
    suras: Vec<Sura>,
    sura_idx: usize,
    ruku_count: usize,
    ruku_idx: usize,
    range: Option<AyatRange>,
    ayat: Vec<String>,
    rtl: bool,
}

impl QuranReader {
    /// Load the sura list and restore the last viewed ruku. `lang` overrides
    /// the language stored in the settings row.
    pub fn open(api: QuranApi, lang: Option<&str>) -> DbResult<Self> {
        let mut reader = Self {
            api,
            suras: Vec::new(),
            sura_idx: 0,
            ruku_count: 0,
            ruku_idx: 0,
            range: None,
            ayat: Vec::new(),
            rtl: false,
        };

        let settings = tolerate_missing(reader.api.load_settings(), "quran settings")?;
        if let Some(stored) = &settings {
            tolerate_missing(reader.api.set_lang(&stored.language), "stored language")?;
        }
        if let Some(lang) = lang {
            reader.api.set_lang(lang)?;
        }
        reader.rtl = reader.api.is_rtl(reader.api.lang())?;
        reader.suras = reader.api.get_sura_names()?;

        let stored = match settings {
            Some(stored) => tolerate_missing(reader.api.get_row(stored.row_id), "stored ruku")?,
            None => None,
        };
        match stored {
            Some(ruku) => reader.goto_ruku(ruku)?,
            None => reader.load_position(0, 0)?,
        }
        info!(
            language = reader.api.lang(),
            suras = reader.suras.len(),
            sura = reader.sura_idx + 1,
            ruku = reader.ruku_idx + 1,
            "quran reader ready"
        );
        Ok(reader)
    }

    pub fn suras(&self) -> &[Sura] {
        &self.suras
    }

    pub fn current_sura(&self) -> Option<&Sura> {
        self.suras.get(self.sura_idx)
    }

    /// 1-based ruku number within the current sura.
    pub fn current_ruku(&self) -> Option<i64> {
        (self.ruku_count > 0).then_some(self.ruku_idx as i64 + 1)
    }

    pub fn ruku_count(&self) -> usize {
        self.ruku_count
    }

    pub fn range(&self) -> Option<AyatRange> {
        self.range
    }

    /// Label such as `Ayas 83 - 86`.
    pub fn range_label(&self) -> String {
        self.range.map(|r| r.to_string()).unwrap_or_default()
    }

    pub fn ayat(&self) -> &[String] {
        &self.ayat
    }

    /// Reference shown under each ayat, e.g. `Al-Baqara 2:83`.
    pub fn ayat_caption(&self, offset: usize) -> Option<String> {
        let sura = self.current_sura()?;
        let range = self.range?;
        Some(format!(
            "{} {}:{}",
            sura.tname,
            sura.number,
            range.start + offset as i64
        ))
    }

    pub fn api(&self) -> &QuranApi {
        &self.api
    }

    pub fn select_sura(&mut self, index: usize) -> DbResult<()> {
        self.load_position(index, 0)?;
        self.save_settings()
    }

    pub fn select_ruku(&mut self, index: usize) -> DbResult<()> {
        self.load_position(self.sura_idx, index)?;
        self.save_settings()
    }

    pub fn next_ruku(&mut self) -> DbResult<()> {
        let target = {
            let mut tree = self.tree();
            navigation::next(&mut tree, &[self.sura_idx, self.ruku_idx])?
        };
        self.apply(target)
    }

    pub fn prev_ruku(&mut self) -> DbResult<()> {
        let target = {
            let mut tree = self.tree();
            navigation::prev(&mut tree, &[self.sura_idx, self.ruku_idx])?
        };
        self.apply(target)
    }

    pub fn random_ruku(&mut self) -> DbResult<()> {
        let ruku = self.api.get_random_ruku()?;
        self.goto_ruku(ruku)?;
        self.save_settings()
    }

    pub fn change_language(&mut self, lang: &str) -> DbResult<()> {
        self.api.set_lang(lang)?;
        self.rtl = self.api.is_rtl(lang)?;
        self.load_position(self.sura_idx, self.ruku_idx)?;
        self.save_settings()
    }

    fn tree(&self) -> QuranTree<'_> {
        QuranTree {
            api: &self.api,
            suras: &self.suras,
            rukus: HashMap::new(),
        }
    }

    fn apply(&mut self, target: Option<Vec<usize>>) -> DbResult<()> {
        match target.as_deref() {
            Some(&[sura, ruku]) => {
                self.load_position(sura, ruku)?;
                self.save_settings()
            }
            _ => {
                debug!("no ruku to move to");
                Ok(())
            }
        }
    }

    fn goto_ruku(&mut self, ruku: RukuRef) -> DbResult<()> {
        let sura = self
            .suras
            .iter()
            .position(|s| s.number == ruku.sura)
            .unwrap_or(0);
        let ruku = usize::try_from(ruku.ruku - 1).unwrap_or(0);
        self.load_position(sura, ruku)
    }

    fn load_position(&mut self, sura: usize, ruku: usize) -> DbResult<()> {
        self.sura_idx = sura.min(self.suras.len().saturating_sub(1));
        let Some(number) = self.current_sura().map(|s| s.number) else {
            self.ruku_count = 0;
            self.ruku_idx = 0;
            self.range = None;
            self.ayat.clear();
            return Ok(());
        };
        self.ruku_count = self.api.get_ruku_count(number)?.max(0) as usize;
        self.ruku_idx = ruku.min(self.ruku_count.saturating_sub(1));
        match self.current_ruku() {
            Some(ruku) => {
                self.range = Some(self.api.get_ayat_range(number, ruku)?);
                self.ayat = self.api.get_ayat_text(number, ruku)?;
            }
            None => {
                self.range = None;
                self.ayat.clear();
            }
        }
        debug!(sura = number, ruku = self.ruku_idx + 1, "quran position loaded");
        Ok(())
    }

    fn save_settings(&self) -> DbResult<()> {
        let (Some(sura), Some(range)) = (self.current_sura(), self.range) else {
            return Ok(());
        };
        tolerate_missing(
            self.api
                .update_settings(self.api.lang(), sura.number, range.start),
            "quran settings row",
        )?;
        Ok(())
    }
}

impl Reader for QuranReader {
    fn name(&self) -> &'static str {
        "Quran Reader"
    }

    fn levels(&self) -> Vec<Level> {
        vec![
            Level {
                label: "Sura",
                key: 's',
                items: self.suras.iter().map(ToString::to_string).collect(),
                selected: (!self.suras.is_empty()).then_some(self.sura_idx),
            },
            Level {
                label: "Ruku",
                key: 'k',
                items: (1..=self.ruku_count).map(|n| n.to_string()).collect(),
                selected: (self.ruku_count > 0).then_some(self.ruku_idx),
            },
        ]
    }

    fn select(&mut self, level: usize, index: usize) -> DbResult<()> {
        match level {
            0 => self.select_sura(index),
            _ => self.select_ruku(index),
        }
    }

    fn next(&mut self) -> DbResult<()> {
        self.next_ruku()
    }

    fn prev(&mut self) -> DbResult<()> {
        self.prev_ruku()
    }

    fn random(&mut self) -> DbResult<()> {
        self.random_ruku()
    }

    fn language(&self) -> String {
        self.api.lang().to_string()
    }

    fn languages(&self) -> DbResult<Vec<String>> {
        self.api.get_lang_list()
    }

    fn set_language(&mut self, lang: &str) -> DbResult<()> {
        self.change_language(lang)
    }

    fn passages(&self) -> Vec<Passage> {
        self.ayat
            .iter()
            .enumerate()
            .map(|(offset, text)| Passage {
                heading: None,
                text: text.clone(),
                caption: self.ayat_caption(offset),
            })
            .collect()
    }

    fn is_rtl(&self) -> bool {
        self.rtl
    }

    fn position_label(&self) -> String {
        match (self.current_sura(), self.current_ruku()) {
            (Some(sura), Some(ruku)) => format!(
                "{} / Ruku {ruku} of {} / {}",
                sura.tname,
                self.ruku_count,
                self.range_label()
            ),
            _ => "No ruku loaded".to_string(),
        }
    }
}

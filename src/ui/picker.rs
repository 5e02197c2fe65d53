/// What a confirmed picker selection applies to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum PickTarget {
    /// A hierarchy level, by depth (0 = source or sura).
    Level(usize),
    Language,
}

/// Modal list used to jump to a source, book, title, sura, ruku or language.
#[derive(Clone, Debug)]
pub(crate) struct Picker {
    pub(crate) title: String,
    pub(crate) target: PickTarget,
    pub(crate) items: Vec<String>,
    pub(crate) selected: usize,
}

impl Picker {
    pub(crate) fn new(
        title: impl Into<String>,
        target: PickTarget,
        items: Vec<String>,
        selected: Option<usize>,
    ) -> Self {
        let selected = selected.unwrap_or(0).min(items.len().saturating_sub(1));
        Self {
            title: title.into(),
            target,
            items,
            selected,
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub(crate) fn move_selection(&mut self, offset: isize) {
        if self.items.is_empty() {
            return;
        }
        let len = self.items.len() as isize;
        let new = (self.selected as isize + offset).clamp(0, len - 1);
        self.selected = new as usize;
    }

    pub(crate) fn select_first(&mut self) {
        self.selected = 0;
    }

    pub(crate) fn select_last(&mut self) {
        self.selected = self.items.len().saturating_sub(1);
    }

    pub(crate) fn current(&self) -> Option<&str> {
        self.items.get(self.selected).map(String::as_str)
    }
}

use std::mem;

use anyhow::Result;
use crossterm::event::KeyCode;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;
use tracing::debug;

use crate::reader::Reader;

use super::helpers::{centered_rect, passage_lines};
use super::picker::{PickTarget, Picker};

/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
/// Lines moved by PageUp/PageDown in the reading pane and pickers.
const PAGE: u16 = 10;

/// Whether the reader pane or a picker owns the keyboard.
enum Mode {
    Normal,
    Picking(Picker),
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Central application state shared across the TUI.
pub struct App {
    reader: Box<dyn Reader>,
    mode: Mode,
    scroll: u16,
    status: Option<StatusMessage>,
}

impl App {
    pub fn new(reader: Box<dyn Reader>) -> Self {
        let status = Some(StatusMessage {
            text: reader.position_label(),
            kind: StatusKind::Info,
        });
        Self {
            reader,
            mode: Mode::Normal,
            scroll: 0,
            status,
        }
    }

    /// Process one key press. Returns `true` when the user asked to quit.
    /// Database failures are returned to the caller, which ends the program.
    pub fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        let mut exit = false;
        let mode = mem::replace(&mut self.mode, Mode::Normal);

        self.mode = match mode {
            Mode::Normal => self.handle_normal_key(code, &mut exit)?,
            Mode::Picking(picker) => self.handle_picker_key(code, picker)?,
        };

        Ok(exit)
    }

    fn handle_normal_key(&mut self, code: KeyCode, exit: &mut bool) -> Result<Mode> {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => *exit = true,
            KeyCode::Char('n') | KeyCode::Right => {
                self.reader.next()?;
                self.after_move();
            }
            KeyCode::Char('p') | KeyCode::Left => {
                self.reader.prev()?;
                self.after_move();
            }
            KeyCode::Char('r') => {
                self.reader.random()?;
                self.after_move();
            }
            KeyCode::Char('l') => {
                let languages = self.reader.languages()?;
                let current = self.reader.language();
                let selected = languages.iter().position(|lang| *lang == current);
                return Ok(self.open_picker(Picker::new(
                    "Language",
                    PickTarget::Language,
                    languages,
                    selected,
                )));
            }
            KeyCode::Up => self.scroll = self.scroll.saturating_sub(1),
            KeyCode::Down => self.scroll = self.scroll.saturating_add(1),
            KeyCode::PageUp => self.scroll = self.scroll.saturating_sub(PAGE),
            KeyCode::PageDown => self.scroll = self.scroll.saturating_add(PAGE),
            KeyCode::Home => self.scroll = 0,
            KeyCode::Char(c) => {
                let levels = self.reader.levels();
                if let Some((depth, level)) =
                    levels.into_iter().enumerate().find(|(_, l)| l.key == c)
                {
                    let title = level.label;
                    return Ok(self.open_picker(Picker::new(
                        title,
                        PickTarget::Level(depth),
                        level.items,
                        level.selected,
                    )));
                }
            }
            _ => {}
        }
        Ok(Mode::Normal)
    }

    fn handle_picker_key(&mut self, code: KeyCode, mut picker: Picker) -> Result<Mode> {
        match code {
            KeyCode::Esc => {
                self.clear_status();
                return Ok(Mode::Normal);
            }
            KeyCode::Up => picker.move_selection(-1),
            KeyCode::Down => picker.move_selection(1),
            KeyCode::PageUp => picker.move_selection(-(PAGE as isize)),
            KeyCode::PageDown => picker.move_selection(PAGE as isize),
            KeyCode::Home => picker.select_first(),
            KeyCode::End => picker.select_last(),
            KeyCode::Enter => {
                match picker.target {
                    PickTarget::Level(depth) => self.reader.select(depth, picker.selected)?,
                    PickTarget::Language => {
                        if let Some(lang) = picker.current() {
                            self.reader.set_language(lang)?;
                        }
                    }
                }
                self.after_move();
                return Ok(Mode::Normal);
            }
            _ => {}
        }
        Ok(Mode::Picking(picker))
    }

    fn open_picker(&mut self, picker: Picker) -> Mode {
        if picker.is_empty() {
            self.set_status(
                format!("No {} entries to choose from.", picker.title.to_lowercase()),
                StatusKind::Error,
            );
            return Mode::Normal;
        }
        debug!(title = %picker.title, items = picker.items.len(), "opening picker");
        self.clear_status();
        Mode::Picking(picker)
    }

    fn after_move(&mut self) {
        self.scroll = 0;
        let label = self.reader.position_label();
        self.set_status(label, StatusKind::Info);
    }

    fn set_status<S: Into<String>>(&mut self, text: S, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let levels = self.reader.levels();
        let header_height = (levels.len() as u16 + 3).min(area.height);
        let footer_height = FOOTER_HEIGHT.min(area.height.saturating_sub(header_height));

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(header_height),
                Constraint::Min(0),
                Constraint::Length(footer_height),
            ])
            .split(area);

        self.draw_header(frame, chunks[0]);
        self.draw_text(frame, chunks[1]);
        if footer_height > 0 {
            self.draw_footer(frame, chunks[2]);
        }

        if let Mode::Picking(picker) = &self.mode {
            self.draw_picker(frame, area, picker);
        }
    }

    fn draw_header(&self, frame: &mut Frame, area: Rect) {
        let label_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        let mut lines: Vec<Line> = self
            .reader
            .levels()
            .into_iter()
            .map(|level| {
                let position = match level.selected {
                    Some(idx) => format!("  [{}/{}]", idx + 1, level.items.len()),
                    None => String::new(),
                };
                Line::from(vec![
                    Span::styled(format!("{:<8}", level.label), label_style),
                    Span::raw(level.current().unwrap_or("-").to_string()),
                    Span::styled(position, Style::default().fg(Color::DarkGray)),
                ])
            })
            .collect();
        lines.push(Line::from(vec![
            Span::styled(format!("{:<8}", "Language"), label_style),
            Span::raw(self.reader.language()),
        ]));

        let block = Block::default()
            .title(self.reader.name())
            .borders(Borders::ALL);
        frame.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn draw_text(&self, frame: &mut Frame, area: Rect) {
        let alignment = if self.reader.is_rtl() {
            Alignment::Right
        } else {
            Alignment::Left
        };
        let lines = passage_lines(&self.reader.passages());
        let body = if lines.is_empty() {
            vec![Line::from("Nothing to show.")]
        } else {
            lines
        };
        let paragraph = Paragraph::new(body)
            .block(Block::default().borders(Borders::LEFT | Borders::RIGHT))
            .alignment(alignment)
            .wrap(Wrap { trim: false })
            .scroll((self.scroll, 0));
        frame.render_widget(paragraph, area);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };

        let paragraph = Paragraph::new(vec![status_line, self.footer_instructions()])
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        let key_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        match &self.mode {
            Mode::Picking(_) => Line::from(vec![
                Span::styled("[↑↓]", key_style),
                Span::raw(" Navigate   "),
                Span::styled("[Enter]", key_style),
                Span::raw(" Select   "),
                Span::styled("[Esc]", key_style),
                Span::raw(" Cancel"),
            ]),
            Mode::Normal => {
                let mut spans = vec![
                    Span::styled("[n/→]", key_style),
                    Span::raw(" Next   "),
                    Span::styled("[p/←]", key_style),
                    Span::raw(" Previous   "),
                    Span::styled("[r]", key_style),
                    Span::raw(" Random   "),
                ];
                for level in self.reader.levels() {
                    spans.push(Span::styled(format!("[{}]", level.key), key_style));
                    spans.push(Span::raw(format!(" {}   ", level.label)));
                }
                spans.extend([
                    Span::styled("[l]", key_style),
                    Span::raw(" Language   "),
                    Span::styled("[q]", key_style),
                    Span::raw(" Quit"),
                ]);
                Line::from(spans)
            }
        }
    }

    fn draw_picker(&self, frame: &mut Frame, area: Rect, picker: &Picker) {
        let popup_area = centered_rect(70, 60, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title(format!("Select {}", picker.title))
            .borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let items: Vec<ListItem> = picker
            .items
            .iter()
            .map(|item| ListItem::new(item.clone()))
            .collect();
        let list = List::new(items)
            .highlight_style(Style::default().fg(Color::Yellow))
            .highlight_symbol("▶ ");

        let mut list_state = ListState::default();
        list_state.select(Some(picker.selected));
        frame.render_stateful_widget(list, inner, &mut list_state);
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    use super::*;
    use crate::error::{DbError, DbResult};
    use crate::reader::{Level, Passage};

    /// Records calls so key handling can be checked without a database.
    #[derive(Default)]
    struct Calls {
        next: usize,
        prev: usize,
        random: usize,
        selected: Vec<(usize, usize)>,
        language: Option<String>,
        /// Make `next` fail as if its query hit a broken table.
        fail_next: bool,
    }

    struct FakeReader(Rc<RefCell<Calls>>);

    impl Reader for FakeReader {
        fn name(&self) -> &'static str {
            "Fake Reader"
        }

        fn levels(&self) -> Vec<Level> {
            vec![
                Level {
                    label: "Sura",
                    key: 's',
                    items: vec!["Al-Faatiha (The Opening)".into(), "Al-Baqara (The Cow)".into()],
                    selected: Some(0),
                },
                Level {
                    label: "Ruku",
                    key: 'k',
                    items: vec!["1".into()],
                    selected: Some(0),
                },
            ]
        }

        fn select(&mut self, level: usize, index: usize) -> DbResult<()> {
            self.0.borrow_mut().selected.push((level, index));
            Ok(())
        }

        fn next(&mut self) -> DbResult<()> {
            let mut calls = self.0.borrow_mut();
            if calls.fail_next {
                return Err(DbError::NotFound {
                    query: "SELECT hadith_text FROM ic_hadith_urdu WHERE id = ?1".into(),
                });
            }
            calls.next += 1;
            Ok(())
        }

        fn prev(&mut self) -> DbResult<()> {
            self.0.borrow_mut().prev += 1;
            Ok(())
        }

        fn random(&mut self) -> DbResult<()> {
            self.0.borrow_mut().random += 1;
            Ok(())
        }

        fn language(&self) -> String {
            "English".into()
        }

        fn languages(&self) -> DbResult<Vec<String>> {
            Ok(vec!["Arabic".into(), "English".into(), "Urdu".into()])
        }

        fn set_language(&mut self, lang: &str) -> DbResult<()> {
            self.0.borrow_mut().language = Some(lang.to_string());
            Ok(())
        }

        fn passages(&self) -> Vec<Passage> {
            vec![Passage {
                heading: None,
                text: "In the name of God".into(),
                caption: Some("Al-Faatiha 1:1".into()),
            }]
        }

        fn is_rtl(&self) -> bool {
            false
        }

        fn position_label(&self) -> String {
            "Al-Faatiha / Ruku 1 of 1".into()
        }
    }

    fn app() -> (App, Rc<RefCell<Calls>>) {
        let calls = Rc::new(RefCell::new(Calls::default()));
        (App::new(Box::new(FakeReader(calls.clone()))), calls)
    }

    #[test]
    fn navigation_keys_reach_the_reader() {
        let (mut app, calls) = app();
        for code in [
            KeyCode::Char('n'),
            KeyCode::Right,
            KeyCode::Char('p'),
            KeyCode::Char('r'),
        ] {
            assert!(!app.handle_key(code).unwrap());
        }
        let calls = calls.borrow();
        assert_eq!((calls.next, calls.prev, calls.random), (2, 1, 1));
    }

    #[test]
    fn reader_errors_end_the_session() {
        let (mut app, calls) = app();
        calls.borrow_mut().fail_next = true;
        let err = app.handle_key(KeyCode::Char('n')).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DbError>(),
            Some(DbError::NotFound { query }) if query.contains("ic_hadith_urdu")
        ));
        assert!(err.to_string().starts_with("Database error:"));
        assert_eq!(calls.borrow().next, 0);
        assert!(matches!(app.mode, Mode::Normal));
    }

    #[test]
    fn level_picker_selects_the_highlighted_entry() {
        let (mut app, calls) = app();
        app.handle_key(KeyCode::Char('s')).unwrap();
        assert!(matches!(app.mode, Mode::Picking(_)));
        app.handle_key(KeyCode::Down).unwrap();
        app.handle_key(KeyCode::Enter).unwrap();
        assert!(matches!(app.mode, Mode::Normal));
        assert_eq!(calls.borrow().selected, vec![(0, 1)]);
    }

    #[test]
    fn language_picker_starts_on_the_current_language() {
        let (mut app, calls) = app();
        app.handle_key(KeyCode::Char('l')).unwrap();
        app.handle_key(KeyCode::Down).unwrap();
        app.handle_key(KeyCode::Enter).unwrap();
        assert_eq!(calls.borrow().language.as_deref(), Some("Urdu"));
    }

    #[test]
    fn escape_cancels_a_picker_without_selecting() {
        let (mut app, calls) = app();
        app.handle_key(KeyCode::Char('k')).unwrap();
        assert!(!app.handle_key(KeyCode::Esc).unwrap());
        assert!(matches!(app.mode, Mode::Normal));
        assert!(calls.borrow().selected.is_empty());
    }

    #[test]
    fn quit_keys_end_the_loop() {
        let (mut app, _) = app();
        assert!(app.handle_key(KeyCode::Char('q')).unwrap());
    }

    #[test]
    fn draw_renders_header_and_text() {
        let (app, _) = app();
        let mut terminal = Terminal::new(TestBackend::new(80, 20)).unwrap();
        terminal.draw(|frame| app.draw(frame)).unwrap();
        let buffer = terminal.backend().buffer();
        let rendered: String = buffer.content().iter().map(|cell| cell.symbol()).collect();
        assert!(rendered.contains("Fake Reader"));
        assert!(rendered.contains("Al-Faatiha (The Opening)"));
        assert!(rendered.contains("In the name of God"));
        assert!(rendered.contains("(Al-Faatiha 1:1)"));
    }
}

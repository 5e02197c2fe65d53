//! Ratatui front-end. A reader screen shows the current selection at every
//! level, the text pane and a footer with key hints; pickers open as modal
//! lists on top.

mod app;
mod helpers;
mod picker;
mod terminal;

pub use app::App;
pub use terminal::run_app;

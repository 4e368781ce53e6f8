pub mod header;
pub mod process_table;
pub mod statusbar;
pub mod theme;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};

use crate::app::App;
use crate::ui::theme::Theme;

pub fn draw<S>(frame: &mut Frame, app: &mut App<S>, theme: &Theme) {
    let header_height = header::height(&app.snapshot, app.show_per_core, frame.area().width);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(header_height),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(frame.area());

    header::render(
        frame,
        chunks[0],
        &app.snapshot,
        app.show_per_core,
        theme,
    );

    app.page_size = process_table::visible_rows(chunks[1]).max(1);
    process_table::render(
        frame,
        chunks[1],
        &app.snapshot.processes,
        app.scroll,
        theme,
    );

    statusbar::render(frame, chunks[2], &app.keybinds.hint_entries(), theme);
}

#[cfg(test)]
mod tests;

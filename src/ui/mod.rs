pub mod confirm;
pub mod header;
pub mod help;
pub mod process_list;
pub mod selection_bar;
pub mod statusbar;
pub mod theme;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};

use crate::app::{App, InputMode};

pub fn draw(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(frame.area());

    let stats = header::HeaderStats {
        session_count: app.processes.len(),
        total_cpu: app.total_cpu(),
        total_mem: app.total_mem(),
        total_memory_bytes: app.total_memory_bytes,
    };
    header::render(frame, chunks[0], &stats, &app.theme);

    process_list::render(
        frame,
        chunks[1],
        &app.processes,
        app.selected_index,
        app.loading,
        app.total_memory_bytes,
        &app.theme,
    );

    let selected = app
        .selected_process()
        .map(selection_bar::SelectionInfo::from_record);
    selection_bar::render(frame, chunks[2], selected, &app.theme);

    statusbar::render(
        frame,
        chunks[3],
        app.input_mode,
        app.status_message.as_ref(),
        &app.theme,
    );

    // Overlays are rendered last to appear on top
    if app.input_mode == InputMode::Confirm
        && let Some(pending) = &app.pending
    {
        confirm::render(frame, frame.area(), pending, &app.theme);
    }
    if app.show_help() {
        help::render(frame, frame.area(), &app.help_entries(), &app.theme);
    }
}

#[cfg(test)]
mod tests;

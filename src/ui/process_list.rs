use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Span;
use ratatui::widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, TableState};

use crate::format::{extract_project_name, format_memory, shorten_path, truncate_unicode};
use crate::system::process::{ProcessRecord, RunState};
use crate::ui::theme::Theme;

const PROJECT_WIDTH: u16 = 22;
const DIR_WIDTH: u16 = 30;

pub fn render(
    frame: &mut Frame,
    area: Rect,
    processes: &[ProcessRecord],
    selected_index: usize,
    loading: bool,
    total_memory_bytes: u64,
    theme: &Theme,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.overlay_border))
        .title(Span::styled(
            " Sessions ",
            Style::default()
                .fg(theme.text_secondary)
                .add_modifier(Modifier::BOLD),
        ));

    if processes.is_empty() {
        let msg = if loading {
            "Loading processes..."
        } else {
            "No Claude sessions found"
        };
        let paragraph = Paragraph::new(msg)
            .alignment(Alignment::Center)
            .style(Style::default().fg(theme.text_secondary))
            .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let header = Row::new(vec![
        "PID", "PROJECT", "CPU", "MEM", "STATE", "KIDS", "DIRECTORY", "STARTED",
    ])
    .style(
        Style::default()
            .fg(theme.text_secondary)
            .add_modifier(Modifier::BOLD),
    );

    let rows = processes
        .iter()
        .map(|p| process_row(p, total_memory_bytes, theme));

    let widths = [
        Constraint::Length(7),
        Constraint::Length(PROJECT_WIDTH),
        Constraint::Length(7),
        Constraint::Length(8),
        Constraint::Length(8),
        Constraint::Length(5),
        Constraint::Length(DIR_WIDTH),
        Constraint::Min(10),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .column_spacing(1)
        .block(block)
        .row_highlight_style(
            Style::default()
                .bg(theme.selection_bg)
                .fg(theme.selection_fg)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▶ ");

    let mut state = TableState::default().with_selected(Some(selected_index));
    frame.render_stateful_widget(table, area, &mut state);
}

fn process_row<'a>(p: &ProcessRecord, total_memory_bytes: u64, theme: &Theme) -> Row<'a> {
    let state_style = match p.state {
        RunState::Running => Style::default().fg(theme.running),
        RunState::Paused => Style::default()
            .fg(theme.paused)
            .add_modifier(Modifier::BOLD),
    };

    Row::new(vec![
        Cell::from(p.pid.to_string()),
        Cell::from(truncate_unicode(
            &extract_project_name(p),
            PROJECT_WIDTH as usize,
        )),
        Cell::from(format!("{:.1}%", p.total_cpu_percent))
            .style(Style::default().fg(theme.cpu_color(p.total_cpu_percent))),
        Cell::from(format_memory(p.total_mem_percent, total_memory_bytes)),
        Cell::from(p.state.label()).style(state_style),
        Cell::from(p.descendants.len().to_string()),
        Cell::from(shorten_path(&p.working_dir, DIR_WIDTH as usize)),
        Cell::from(p.start_time.clone()),
    ])
    .style(Style::default().fg(theme.text_primary))
}

use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph};

use crate::app::PendingAction;
use crate::format::truncate_unicode;
use crate::system::lifecycle::LifecycleAction;
use crate::ui::help::centered_rect;
use crate::ui::theme::Theme;

const DIALOG_WIDTH: u16 = 48;
const DIALOG_HEIGHT: u16 = 7;

pub fn render(frame: &mut Frame, area: Rect, pending: &PendingAction, theme: &Theme) {
    let width = DIALOG_WIDTH.min(area.width.saturating_sub(2));
    let height = DIALOG_HEIGHT.min(area.height);
    let dialog = centered_rect(width, height, area);

    frame.render_widget(Clear, dialog);

    let accent = match pending.action {
        LifecycleAction::Terminate => theme.danger,
        LifecycleAction::Suspend => theme.paused,
        LifecycleAction::Resume => theme.running,
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(accent))
        .title(Span::styled(
            format!(" Confirm {} ", pending.action.verb()),
            Style::default().fg(accent).add_modifier(Modifier::BOLD),
        ));

    let project_width = (width as usize).saturating_sub(16);
    let lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled(
                format!("{} ", capitalize(pending.action.verb())),
                Style::default().fg(theme.text_primary),
            ),
            Span::styled(
                truncate_unicode(&pending.project, project_width),
                Style::default()
                    .fg(theme.text_primary)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!(" (PID {})?", pending.pid),
                Style::default().fg(theme.text_secondary),
            ),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled(
                " y ",
                Style::default()
                    .fg(theme.pill_key_fg)
                    .bg(theme.pill_key_bg)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(" confirm   ", Style::default().fg(theme.text_secondary)),
            Span::styled(
                " n ",
                Style::default()
                    .fg(theme.pill_key_fg)
                    .bg(theme.pill_key_bg)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(" cancel", Style::default().fg(theme.text_secondary)),
        ]),
    ];

    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .style(Style::default().bg(theme.surface_bg))
            .block(block),
        dialog,
    );
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

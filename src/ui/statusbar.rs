use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::app::{InputMode, StatusMessage};
use crate::ui::theme::Theme;

pub fn render(
    frame: &mut Frame,
    area: Rect,
    input_mode: InputMode,
    status_message: Option<&StatusMessage>,
    theme: &Theme,
) {
    let bg_style = Style::default().bg(theme.statusbar_bg);

    // Status message takes priority
    if let Some(message) = status_message {
        let color = if message.is_error {
            theme.status_err
        } else {
            theme.status_ok
        };
        let line = Line::from(Span::styled(
            format!(" {}", message.text),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ));
        frame.render_widget(Paragraph::new(line).style(bg_style), area);
        return;
    }

    let mut spans = Vec::new();
    match input_mode {
        InputMode::Confirm => {
            spans.extend(pill_spans("y", "Confirm", theme));
            spans.extend(pill_spans("n", "Cancel", theme));
        }
        InputMode::Help => {
            spans.extend(pill_spans("Esc", "Close help", theme));
        }
        InputMode::Normal => {
            spans.extend(pill_spans("j/k", "Nav", theme));
            spans.extend(pill_spans("K", "Kill", theme));
            spans.extend(pill_spans("p", "Pause", theme));
            spans.extend(pill_spans("r", "Resume", theme));
            spans.extend(pill_spans("R", "Refresh", theme));
            spans.extend(pill_spans("?", "Help", theme));
            spans.extend(pill_spans("q", "Quit", theme));
        }
    }

    frame.render_widget(Paragraph::new(Line::from(spans)).style(bg_style), area);
}

fn pill_spans<'a>(key: &'a str, desc: &'a str, theme: &Theme) -> Vec<Span<'a>> {
    vec![
        Span::raw(" "),
        Span::styled(
            format!(" {key} "),
            Style::default()
                .fg(theme.pill_key_fg)
                .bg(theme.pill_key_bg)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" {desc}"),
            Style::default().fg(theme.pill_desc_fg).bg(theme.surface_bg),
        ),
    ]
}

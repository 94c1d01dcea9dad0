use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

use crate::format::format_memory;
use crate::ui::theme::Theme;

pub struct HeaderStats {
    pub session_count: usize,
    pub total_cpu: f32,
    pub total_mem: f32,
    pub total_memory_bytes: u64,
}

pub fn render(frame: &mut Frame, area: Rect, stats: &HeaderStats, theme: &Theme) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.overlay_border));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let label = Style::default().fg(theme.text_secondary);
    let value = Style::default()
        .fg(theme.text_primary)
        .add_modifier(Modifier::BOLD);

    let line = Line::from(vec![
        Span::styled(
            " clauditor ",
            Style::default()
                .fg(theme.header_accent_fg)
                .bg(theme.header_accent_bg)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled("Sessions: ", label),
        Span::styled(stats.session_count.to_string(), value),
        Span::raw("  "),
        Span::styled("CPU: ", label),
        Span::styled(
            format!("{:.1}%", stats.total_cpu),
            Style::default()
                .fg(theme.cpu_color(stats.total_cpu))
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled("MEM: ", label),
        Span::styled(
            format!(
                "{} ({:.1}%)",
                format_memory(stats.total_mem, stats.total_memory_bytes),
                stats.total_mem
            ),
            value,
        ),
    ]);

    frame.render_widget(Paragraph::new(line), inner);
}

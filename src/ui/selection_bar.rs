use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use unicode_width::UnicodeWidthStr;

use crate::format::truncate_unicode;
use crate::system::process::ProcessRecord;
use crate::ui::theme::Theme;

/// What the bar shows about the highlighted session.
#[derive(Debug, Clone)]
pub struct SelectionInfo {
    pub location: String,
    pub pid: u32,
    pub started: String,
}

impl SelectionInfo {
    pub fn from_record(record: &ProcessRecord) -> Self {
        let location = if record.working_dir.is_empty() {
            format!("{} {}", record.command, record.args).trim().to_string()
        } else {
            record.working_dir.clone()
        };
        Self {
            location,
            pid: record.pid,
            started: record.start_time.clone(),
        }
    }
}

pub fn render(frame: &mut Frame, area: Rect, selected: Option<SelectionInfo>, theme: &Theme) {
    let style = Style::default()
        .bg(theme.statusbar_bg)
        .fg(theme.text_primary);
    let width = area.width as usize;
    let line = match selected {
        Some(selection) => format_selection_line(&selection, width),
        None => " ".repeat(width),
    };

    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(line, style))).style(style),
        area,
    );
}

fn format_selection_line(selection: &SelectionInfo, width: usize) -> String {
    if width == 0 {
        return String::new();
    }

    let mut right = format!("PID {} · {}", selection.pid, selection.started);
    if right.width() > width {
        right = truncate_unicode(&right, width);
        let pad = width.saturating_sub(right.width());
        return format!("{}{}", " ".repeat(pad), right);
    }

    let right_width = right.width();
    let left_capacity = width.saturating_sub(right_width + 1);
    let left = truncate_unicode(&selection.location, left_capacity);
    let gap = width.saturating_sub(left.width() + right_width);
    format!("{left}{}{right}", " ".repeat(gap))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(location: &str) -> SelectionInfo {
        SelectionInfo {
            location: location.to_string(),
            pid: 4242,
            started: "Mon Jan  1 12:00:00 2024".to_string(),
        }
    }

    #[test]
    fn keeps_pid_right_aligned() {
        let line = format_selection_line(&info("/Users/dev/code/some/deeply/nested/project"), 50);
        assert_eq!(line.width(), 50);
        assert!(line.ends_with("12:00:00 2024"));
        assert!(line.starts_with("/Users/dev"));
    }

    #[test]
    fn narrow_width_keeps_only_pid_side() {
        let line = format_selection_line(&info("/tmp/x"), 10);
        assert_eq!(line.width(), 10);
        assert!(line.contains("PID"));
        assert!(!line.contains("/tmp"));
    }

    #[test]
    fn falls_back_to_command_line_without_cwd() {
        let record = ProcessRecord {
            pid: 9,
            ppid: 1,
            cpu_percent: 0.0,
            mem_percent: 0.0,
            total_cpu_percent: 0.0,
            total_mem_percent: 0.0,
            state: Default::default(),
            command: "claude".to_string(),
            args: "--resume".to_string(),
            start_time: String::new(),
            working_dir: String::new(),
            descendants: Vec::new(),
        };
        assert_eq!(SelectionInfo::from_record(&record).location, "claude --resume");
    }
}

use std::sync::LazyLock;

use regex::Regex;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::system::process::ProcessRecord;

const GB: f64 = 1024.0 * 1024.0 * 1024.0;
const MB: f64 = 1024.0 * 1024.0;
const ARGS_PREVIEW_CHARS: usize = 20;

static PROJECT_ARG_PATTERNS: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    [
        Regex::new(r"--cwd[= ](\S+)").expect("static regex"),
        Regex::new(r"--project[= ](\S+)").expect("static regex"),
        Regex::new(r#""([^"]+)""#).expect("static regex"),
    ]
});

pub fn truncate_unicode(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    let mut result = String::new();
    let mut width = 0;
    for ch in s.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if width + ch_width > max_width.saturating_sub(1) {
            result.push('\u{2026}');
            break;
        }
        result.push(ch);
        width += ch_width;
    }
    result
}

/// Memory share as a size: whole MB below 1 GB, one decimal of GB above.
pub fn format_memory(percent: f32, total_bytes: u64) -> String {
    let used = percent as f64 / 100.0 * total_bytes as f64;
    if used < GB {
        format!("{:.0}MB", used / MB)
    } else {
        format!("{:.1}GB", used / GB)
    }
}

/// `-` for an empty path; otherwise keeps the tail that fits in `max_len`.
pub fn shorten_path(path: &str, max_len: usize) -> String {
    if path.is_empty() {
        return "-".to_string();
    }
    if path.chars().count() <= max_len {
        return path.to_string();
    }

    let parts: Vec<&str> = path.split('/').collect();
    if parts.len() <= 2 {
        return path.to_string();
    }

    let shortened = format!(".../{}", parts[parts.len() - 2..].join("/"));
    if shortened.chars().count() <= max_len {
        return shortened;
    }

    let last = parts[parts.len() - 1];
    let keep = max_len.saturating_sub(4);
    format!(".../{}", last.chars().take(keep).collect::<String>())
}

/// Short name for a session: the working directory's last component, else a
/// path-like argument, else a preview of the arguments.
pub fn extract_project_name(record: &ProcessRecord) -> String {
    if let Some(last) = record.working_dir.split('/').rfind(|p| !p.is_empty()) {
        return last.to_string();
    }

    let args = record.args.as_str();
    for pattern in PROJECT_ARG_PATTERNS.iter() {
        if let Some(path) = pattern.captures(args).and_then(|c| c.get(1)) {
            let path = path.as_str();
            let last = path.rsplit('/').next().unwrap_or_default();
            return if last.is_empty() { path } else { last }.to_string();
        }
    }

    if args.contains("--resume") {
        return "resumed session".to_string();
    }
    if args.chars().count() > ARGS_PREVIEW_CHARS {
        return format!(
            "{}...",
            args.chars().take(ARGS_PREVIEW_CHARS).collect::<String>()
        );
    }
    if args.is_empty() {
        record.command.clone()
    } else {
        args.to_string()
    }
}

use std::path::{Path, PathBuf};

use crossterm::event::KeyCode;
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,
    pub identify: IdentifyConfig,
    pub colors: ColorsConfig,
    pub keybinds: KeybindsConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub refresh_rate_ms: u64,
    /// `ps` or `sysinfo`.
    pub source: String,
    /// Used to turn memory percentages into sizes; 0 asks the OS.
    pub total_memory_gb: f64,
    pub log_file: Option<PathBuf>,
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        GeneralConfig {
            refresh_rate_ms: 2000,
            source: "ps".to_string(),
            total_memory_gb: 0.0,
            log_file: None,
            log_level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IdentifyConfig {
    /// Executable name matched as a whole word in the command line.
    pub token: String,
    /// Records mentioning any of these are helper shells, not sessions.
    pub excluded_paths: Vec<String>,
    /// Markers of the desktop app.
    pub gui_markers: Vec<String>,
    /// Names this monitor may run under.
    pub self_names: Vec<String>,
}

impl Default for IdentifyConfig {
    fn default() -> Self {
        IdentifyConfig {
            token: "claude".to_string(),
            excluded_paths: vec![".claude/shell-snapshots".to_string()],
            gui_markers: vec!["Claude.app".to_string()],
            self_names: vec!["clauditor".to_string(), "claude-monitor".to_string()],
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ColorsConfig {
    pub theme: String,
}

impl Default for ColorsConfig {
    fn default() -> Self {
        ColorsConfig {
            theme: "dark".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct KeybindsConfig {
    pub quit: String,
    pub down: String,
    pub up: String,
    pub first: String,
    pub last: String,
    pub kill: String,
    pub pause: String,
    pub resume: String,
    pub refresh: String,
    pub help: String,
}

impl Default for KeybindsConfig {
    fn default() -> Self {
        KeybindsConfig {
            quit: "q".to_string(),
            down: "j".to_string(),
            up: "k".to_string(),
            first: "g".to_string(),
            last: "G".to_string(),
            kill: "K".to_string(),
            pause: "p".to_string(),
            resume: "r".to_string(),
            refresh: "R".to_string(),
            help: "?".to_string(),
        }
    }
}

/// Single characters map to themselves; a few names map to special keys.
pub fn parse_key(s: &str) -> Option<KeyCode> {
    let mut chars = s.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return Some(KeyCode::Char(c));
    }
    match s.to_lowercase().as_str() {
        "enter" | "return" => Some(KeyCode::Enter),
        "esc" | "escape" => Some(KeyCode::Esc),
        "tab" => Some(KeyCode::Tab),
        "space" => Some(KeyCode::Char(' ')),
        "backspace" => Some(KeyCode::Backspace),
        "delete" | "del" => Some(KeyCode::Delete),
        _ => None,
    }
}

pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("clauditor").join("config.toml"))
}

pub fn load_config() -> Config {
    match config_path() {
        Some(path) if path.exists() => load_config_from_path(&path),
        _ => Config::default(),
    }
}

pub fn load_config_from_path(path: &Path) -> Config {
    match std::fs::read_to_string(path) {
        Ok(contents) => toml::from_str(&contents).unwrap_or_default(),
        Err(_) => Config::default(),
    }
}

use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::action::{Action, Direction};
use crate::config::{Config, KeybindsConfig, parse_key};
use crate::format::extract_project_name;
use crate::system::lifecycle::LifecycleAction;
use crate::system::process::ProcessRecord;
use crate::ui::theme::Theme;

const STATUS_TTL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Confirm,
    Help,
}

#[derive(Debug, Clone)]
pub struct ResolvedKeybinds {
    pub quit: KeyCode,
    pub down: KeyCode,
    pub up: KeyCode,
    pub first: KeyCode,
    pub last: KeyCode,
    pub kill: KeyCode,
    pub pause: KeyCode,
    pub resume: KeyCode,
    pub refresh: KeyCode,
    pub help: KeyCode,
}

impl ResolvedKeybinds {
    pub fn from_config(kb: &KeybindsConfig) -> Self {
        Self {
            quit: parse_key(&kb.quit).unwrap_or(KeyCode::Char('q')),
            down: parse_key(&kb.down).unwrap_or(KeyCode::Char('j')),
            up: parse_key(&kb.up).unwrap_or(KeyCode::Char('k')),
            first: parse_key(&kb.first).unwrap_or(KeyCode::Char('g')),
            last: parse_key(&kb.last).unwrap_or(KeyCode::Char('G')),
            kill: parse_key(&kb.kill).unwrap_or(KeyCode::Char('K')),
            pause: parse_key(&kb.pause).unwrap_or(KeyCode::Char('p')),
            resume: parse_key(&kb.resume).unwrap_or(KeyCode::Char('r')),
            refresh: parse_key(&kb.refresh).unwrap_or(KeyCode::Char('R')),
            help: parse_key(&kb.help).unwrap_or(KeyCode::Char('?')),
        }
    }

    pub fn help_entries(&self) -> Vec<(String, &'static str)> {
        vec![
            (key_label(self.down), "Next session"),
            (key_label(self.up), "Previous session"),
            (key_label(self.first), "First session"),
            (key_label(self.last), "Last session"),
            (key_label(self.kill), "Kill session tree (SIGKILL)"),
            (key_label(self.pause), "Pause session tree (SIGSTOP)"),
            (key_label(self.resume), "Resume session tree (SIGCONT)"),
            (key_label(self.refresh), "Refresh now"),
            (key_label(self.help), "Toggle help"),
            (key_label(self.quit), "Quit"),
            ("↑↓".to_string(), "Navigate"),
            ("Ctrl+C".to_string(), "Quit (always)"),
        ]
    }
}

pub fn key_label(code: KeyCode) -> String {
    match code {
        KeyCode::Char(' ') => "Space".to_string(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Esc => "Esc".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::Backspace => "Bksp".to_string(),
        KeyCode::Delete => "Del".to_string(),
        _ => "?".to_string(),
    }
}

/// A lifecycle action waiting for confirmation.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingAction {
    pub action: LifecycleAction,
    pub pid: u32,
    pub project: String,
}

/// Work the event loop must start on behalf of the app.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    None,
    Refresh,
    Lifecycle(PendingAction),
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatusMessage {
    pub text: String,
    pub is_error: bool,
    pub created: Instant,
}

pub struct App {
    pub running: bool,
    pub loading: bool,
    pub processes: Vec<ProcessRecord>,
    pub selected_index: usize,
    pub input_mode: InputMode,
    pub pending: Option<PendingAction>,
    pub status_message: Option<StatusMessage>,
    pub total_memory_bytes: u64,
    pub theme: Theme,
    pub keybinds: ResolvedKeybinds,
}

impl App {
    pub fn new(config: &Config, total_memory_bytes: u64) -> Self {
        App {
            running: true,
            loading: true,
            processes: Vec::new(),
            selected_index: 0,
            input_mode: InputMode::Normal,
            pending: None,
            status_message: None,
            total_memory_bytes,
            theme: Theme::from_config(&config.colors.theme),
            keybinds: ResolvedKeybinds::from_config(&config.keybinds),
        }
    }

    pub fn apply_refresh(&mut self, processes: Vec<ProcessRecord>) {
        self.processes = processes;
        self.loading = false;
        if self.selected_index >= self.processes.len() {
            self.selected_index = self.processes.len().saturating_sub(1);
        }
    }

    pub fn apply_lifecycle_result(
        &mut self,
        action: LifecycleAction,
        pid: u32,
        project: &str,
        success: bool,
    ) {
        if success {
            self.set_status(format!("{} {project} (PID {pid})", action.past_tense()), false);
        } else {
            self.set_status(format!("Failed to {} {project}", action.verb()), true);
        }
    }

    pub fn on_tick(&mut self) {
        if let Some(message) = &self.status_message
            && message.created.elapsed() >= STATUS_TTL
        {
            self.status_message = None;
        }
    }

    pub fn total_cpu(&self) -> f32 {
        self.processes.iter().map(|p| p.total_cpu_percent).sum()
    }

    pub fn total_mem(&self) -> f32 {
        self.processes.iter().map(|p| p.total_mem_percent).sum()
    }

    pub fn selected_process(&self) -> Option<&ProcessRecord> {
        self.processes.get(self.selected_index)
    }

    pub fn show_help(&self) -> bool {
        self.input_mode == InputMode::Help
    }

    pub fn help_entries(&self) -> Vec<(String, &'static str)> {
        self.keybinds.help_entries()
    }

    pub fn map_key(&self, key: KeyEvent) -> Action {
        // Ctrl+C always quits (hardwired safety)
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Action::Quit;
        }

        match self.input_mode {
            InputMode::Normal => self.map_key_normal(key),
            InputMode::Confirm => map_key_confirm(key),
            InputMode::Help => self.map_key_help(key),
        }
    }

    fn map_key_normal(&self, key: KeyEvent) -> Action {
        let code = key.code;
        let kb = &self.keybinds;

        match code {
            KeyCode::Up => return Action::Navigate(Direction::Up),
            KeyCode::Down => return Action::Navigate(Direction::Down),
            KeyCode::Home => return Action::Navigate(Direction::First),
            KeyCode::End => return Action::Navigate(Direction::Last),
            _ => {}
        }

        if code == kb.quit {
            Action::Quit
        } else if code == kb.down {
            Action::Navigate(Direction::Down)
        } else if code == kb.up {
            Action::Navigate(Direction::Up)
        } else if code == kb.first {
            Action::Navigate(Direction::First)
        } else if code == kb.last {
            Action::Navigate(Direction::Last)
        } else if code == kb.kill {
            Action::Request(LifecycleAction::Terminate)
        } else if code == kb.pause {
            Action::Request(LifecycleAction::Suspend)
        } else if code == kb.resume {
            Action::Request(LifecycleAction::Resume)
        } else if code == kb.refresh {
            Action::Refresh
        } else if code == kb.help {
            Action::ToggleHelp
        } else {
            Action::None
        }
    }

    fn map_key_help(&self, key: KeyEvent) -> Action {
        if key.code == self.keybinds.help || key.code == KeyCode::Esc {
            return Action::ToggleHelp;
        }
        Action::None
    }

    pub fn dispatch(&mut self, action: Action) -> Effect {
        match action {
            Action::Quit => self.running = false,
            Action::Navigate(direction) => self.navigate(direction),
            Action::Request(lifecycle) => self.request(lifecycle),
            Action::Confirm => {
                self.input_mode = InputMode::Normal;
                if let Some(pending) = self.pending.take() {
                    return Effect::Lifecycle(pending);
                }
            }
            Action::Cancel => {
                self.pending = None;
                self.input_mode = InputMode::Normal;
            }
            Action::ToggleHelp => {
                self.input_mode = if self.input_mode == InputMode::Help {
                    InputMode::Normal
                } else {
                    InputMode::Help
                };
            }
            Action::Refresh => {
                self.set_status("Refreshed".to_string(), false);
                return Effect::Refresh;
            }
            Action::None => {}
        }
        Effect::None
    }

    fn navigate(&mut self, direction: Direction) {
        let last = self.processes.len().saturating_sub(1);
        self.selected_index = match direction {
            Direction::Up => self.selected_index.saturating_sub(1),
            Direction::Down => (self.selected_index + 1).min(last),
            Direction::First => 0,
            Direction::Last => last,
        };
    }

    fn request(&mut self, action: LifecycleAction) {
        let Some(process) = self.selected_process() else {
            return;
        };

        match (action, process.is_paused()) {
            (LifecycleAction::Suspend, true) => {
                self.set_status(
                    "Process is already paused. Use 'r' to resume.".to_string(),
                    true,
                );
            }
            (LifecycleAction::Resume, false) => {
                self.set_status("Process is already running.".to_string(), true);
            }
            _ => {
                self.pending = Some(PendingAction {
                    action,
                    pid: process.pid,
                    project: extract_project_name(process),
                });
                self.input_mode = InputMode::Confirm;
            }
        }
    }

    fn set_status(&mut self, text: String, is_error: bool) {
        self.status_message = Some(StatusMessage {
            text,
            is_error,
            created: Instant::now(),
        });
    }
}

fn map_key_confirm(key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => Action::Confirm,
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => Action::Cancel,
        _ => Action::None,
    }
}

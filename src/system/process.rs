use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RunState {
    #[default]
    Running,
    Paused,
}

impl RunState {
    /// `T` (stopped) is the only code reported as paused; sleeping, running
    /// and everything else count as running.
    pub fn from_state_code(code: &str) -> Self {
        if code.starts_with('T') {
            RunState::Paused
        } else {
            RunState::Running
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RunState::Running => "running",
            RunState::Paused => "paused",
        }
    }
}

/// One monitored session. Rebuilt from scratch on every refresh tick.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ProcessRecord {
    pub pid: u32,
    pub ppid: u32,
    pub cpu_percent: f32,
    pub mem_percent: f32,
    /// Own usage plus every descendant found in the metrics index.
    pub total_cpu_percent: f32,
    pub total_mem_percent: f32,
    pub state: RunState,
    /// Executable basename.
    pub command: String,
    pub args: String,
    pub start_time: String,
    pub working_dir: String,
    /// Pre-order, never contains `pid`.
    pub descendants: Vec<u32>,
}

impl ProcessRecord {
    pub fn is_paused(&self) -> bool {
        self.state == RunState::Paused
    }
}

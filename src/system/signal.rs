use sysinfo::{Pid, ProcessRefreshKind, ProcessesToUpdate, Signal, System};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CascadeSignal {
    Kill,
    Stop,
    Continue,
}

impl CascadeSignal {
    pub fn name(self) -> &'static str {
        match self {
            CascadeSignal::Kill => "SIGKILL",
            CascadeSignal::Stop => "SIGSTOP",
            CascadeSignal::Continue => "SIGCONT",
        }
    }

    fn to_sysinfo(self) -> Signal {
        match self {
            CascadeSignal::Kill => Signal::Kill,
            CascadeSignal::Stop => Signal::Stop,
            CascadeSignal::Continue => Signal::Continue,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignalResult {
    Delivered,
    Failed(String),
    NotFound,
}

impl SignalResult {
    pub fn is_delivered(&self) -> bool {
        matches!(self, SignalResult::Delivered)
    }
}

pub trait Signaller: Send + Sync {
    fn send(&self, pid: u32, signal: CascadeSignal) -> SignalResult;
}

/// Looks the pid up in a fresh single-process refresh and signals it
/// through sysinfo.
#[derive(Debug, Clone, Copy, Default)]
pub struct SysinfoSignaller;

impl Signaller for SysinfoSignaller {
    fn send(&self, pid: u32, signal: CascadeSignal) -> SignalResult {
        let sys_pid = Pid::from_u32(pid);
        let mut sys = System::new();
        sys.refresh_processes_specifics(
            ProcessesToUpdate::Some(&[sys_pid]),
            false,
            ProcessRefreshKind::nothing(),
        );

        let Some(process) = sys.process(sys_pid) else {
            return SignalResult::NotFound;
        };
        match process.kill_with(signal.to_sysinfo()) {
            Some(true) => SignalResult::Delivered,
            Some(false) => SignalResult::Failed(format!(
                "failed to send {} to PID {pid} (permission denied?)",
                signal.name()
            )),
            None => SignalResult::Failed(format!(
                "{} is not supported on this platform",
                signal.name()
            )),
        }
    }
}

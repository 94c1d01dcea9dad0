use sysinfo::{Pid, ProcessRefreshKind, ProcessesToUpdate, System, UpdateKind};

/// Best-effort working directory of `pid`. Permission errors and processes
/// that are already gone both yield an empty string.
pub fn resolve_cwd(pid: u32) -> String {
    let sys_pid = Pid::from_u32(pid);
    let mut sys = System::new();
    sys.refresh_processes_specifics(
        ProcessesToUpdate::Some(&[sys_pid]),
        false,
        ProcessRefreshKind::nothing().with_cwd(UpdateKind::Always),
    );

    sys.process(sys_pid)
        .and_then(|process| process.cwd())
        .map(|path| path.to_string_lossy().to_string())
        .unwrap_or_default()
}

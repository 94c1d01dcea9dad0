//! OS process-table queries.
//!
//! The three queries are independent and not taken at the same instant.
//! A failed query yields an empty result; callers treat that the same as
//! "nothing found".

use std::process::Command;
use std::sync::Arc;

use chrono::{DateTime, Local};
use sysinfo::{
    MINIMUM_CPU_UPDATE_INTERVAL, ProcessRefreshKind, ProcessStatus, ProcessesToUpdate, System,
    UpdateKind,
};

use super::aggregate::{ProcessMetrics, ProcessMetricsIndex};
use super::cwd::resolve_cwd;
use super::snapshot::{parse_link_line, parse_metrics_line};

pub trait ProcessSource: Send + Sync {
    /// One textual record per process:
    /// `PID PPID %CPU %MEM STATE LSTART(5 fields) COMMAND...`.
    fn process_table(&self) -> Vec<String>;

    /// `(pid, ppid)` for every process.
    fn parent_links(&self) -> Vec<(u32, u32)>;

    fn metrics(&self) -> ProcessMetricsIndex;

    fn cwd(&self, pid: u32) -> String {
        resolve_cwd(pid)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SourceKind {
    #[default]
    Ps,
    Sysinfo,
}

impl SourceKind {
    pub fn from_config_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "sysinfo" | "native" => SourceKind::Sysinfo,
            _ => SourceKind::Ps,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SourceKind::Ps => "ps",
            SourceKind::Sysinfo => "sysinfo",
        }
    }

    pub fn build(self) -> Arc<dyn ProcessSource> {
        match self {
            SourceKind::Ps => Arc::new(PsSource),
            SourceKind::Sysinfo => Arc::new(SysinfoSource),
        }
    }
}

/// Shells out to `ps`, one invocation per query.
#[derive(Debug, Clone, Copy, Default)]
pub struct PsSource;

impl PsSource {
    fn run(columns: &str) -> Vec<String> {
        let output = match Command::new("ps")
            .args(["-eo", columns])
            .env("LC_ALL", "C")
            .output()
        {
            Ok(output) => output,
            Err(err) => {
                tracing::warn!(%err, columns, "failed to run ps");
                return Vec::new();
            }
        };
        if !output.status.success() {
            tracing::warn!(status = %output.status, columns, "ps exited unsuccessfully");
            return Vec::new();
        }

        String::from_utf8_lossy(&output.stdout)
            .lines()
            .skip(1)
            .map(str::to_string)
            .collect()
    }
}

impl ProcessSource for PsSource {
    fn process_table(&self) -> Vec<String> {
        Self::run("pid,ppid,pcpu,pmem,state,lstart,command")
    }

    fn parent_links(&self) -> Vec<(u32, u32)> {
        Self::run("pid,ppid")
            .iter()
            .filter_map(|line| parse_link_line(line))
            .collect()
    }

    fn metrics(&self) -> ProcessMetricsIndex {
        Self::run("pid,pcpu,pmem")
            .iter()
            .filter_map(|line| parse_metrics_line(line))
            .collect()
    }
}

/// Answers the same queries in-process through sysinfo. CPU usage needs two
/// refreshes, so the table and metrics queries each block for
/// `MINIMUM_CPU_UPDATE_INTERVAL`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SysinfoSource;

impl SysinfoSource {
    fn sampled(kind: ProcessRefreshKind) -> System {
        let mut sys = System::new();
        sys.refresh_memory();
        sys.refresh_processes_specifics(ProcessesToUpdate::All, true, kind);
        std::thread::sleep(MINIMUM_CPU_UPDATE_INTERVAL);
        sys.refresh_processes_specifics(ProcessesToUpdate::All, true, kind);
        sys
    }

    fn mem_percent(memory: u64, total: u64) -> f32 {
        if total == 0 {
            0.0
        } else {
            (memory as f64 / total as f64 * 100.0) as f32
        }
    }
}

impl ProcessSource for SysinfoSource {
    fn process_table(&self) -> Vec<String> {
        let sys = Self::sampled(
            ProcessRefreshKind::nothing()
                .with_cpu()
                .with_memory()
                .with_cmd(UpdateKind::OnlyIfNotSet),
        );
        let total = sys.total_memory();

        sys.processes()
            .iter()
            .filter(|(_, process)| process.thread_kind().is_none())
            .map(|(pid, process)| {
                let ppid = process.parent().map(|p| p.as_u32()).unwrap_or(0);
                let state = if process.status() == ProcessStatus::Stop {
                    'T'
                } else {
                    'S'
                };
                let mut command = process
                    .cmd()
                    .iter()
                    .map(|s| s.to_string_lossy().to_string())
                    .collect::<Vec<_>>()
                    .join(" ");
                if command.is_empty() {
                    command = process.name().to_string_lossy().to_string();
                }
                format!(
                    "{} {} {:.1} {:.1} {} {} {}",
                    pid.as_u32(),
                    ppid,
                    process.cpu_usage(),
                    Self::mem_percent(process.memory(), total),
                    state,
                    lstart(process.start_time()),
                    command
                )
            })
            .collect()
    }

    fn parent_links(&self) -> Vec<(u32, u32)> {
        let mut sys = System::new();
        sys.refresh_processes_specifics(
            ProcessesToUpdate::All,
            true,
            ProcessRefreshKind::nothing(),
        );
        sys.processes()
            .iter()
            .filter(|(_, process)| process.thread_kind().is_none())
            .filter_map(|(pid, process)| process.parent().map(|ppid| (pid.as_u32(), ppid.as_u32())))
            .collect()
    }

    fn metrics(&self) -> ProcessMetricsIndex {
        let sys = Self::sampled(ProcessRefreshKind::nothing().with_cpu().with_memory());
        let total = sys.total_memory();
        sys.processes()
            .iter()
            .map(|(pid, process)| {
                (
                    pid.as_u32(),
                    ProcessMetrics {
                        cpu: process.cpu_usage(),
                        mem: Self::mem_percent(process.memory(), total),
                    },
                )
            })
            .collect()
    }
}

/// Start time in the five-field layout `ps` uses for `lstart`.
pub fn lstart(epoch_secs: u64) -> String {
    DateTime::from_timestamp(epoch_secs as i64, 0)
        .map(|utc| {
            utc.with_timezone(&Local)
                .format("%a %b %e %H:%M:%S %Y")
                .to_string()
        })
        .unwrap_or_else(|| "- - - - -".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::snapshot::parse_table_line;

    #[test]
    fn lstart_has_five_fields() {
        assert_eq!(lstart(1_700_000_000).split_whitespace().count(), 5);
        assert_eq!(lstart(u64::MAX).split_whitespace().count(), 5);
    }

    #[test]
    fn source_kind_from_config() {
        assert_eq!(SourceKind::from_config_str("sysinfo"), SourceKind::Sysinfo);
        assert_eq!(SourceKind::from_config_str("PS"), SourceKind::Ps);
        assert_eq!(SourceKind::from_config_str("bogus"), SourceKind::Ps);
    }

    #[test]
    fn sysinfo_table_lines_parse() {
        let lines = SysinfoSource.process_table();
        let own = std::process::id();
        let parsed: Vec<_> = lines.iter().filter_map(|l| parse_table_line(l)).collect();
        assert!(parsed.iter().any(|p| p.pid == own));
    }

    #[test]
    fn sysinfo_links_include_current_process() {
        let own = std::process::id();
        assert!(
            SysinfoSource
                .parent_links()
                .iter()
                .any(|&(pid, _)| pid == own)
        );
    }

    #[cfg(unix)]
    #[test]
    fn ps_queries_see_current_process() {
        let own = std::process::id();
        let links = PsSource.parent_links();
        if links.is_empty() {
            // ps unavailable in this environment; an empty result is the contract.
            return;
        }
        assert!(links.iter().any(|&(pid, _)| pid == own));
        assert!(PsSource.metrics().get(own).is_some());
    }
}

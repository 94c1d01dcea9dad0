//! Parsing of raw process-table records.
//!
//! Every source hands the core textual records in the `ps` layout
//! `PID PPID %CPU %MEM STATE LSTART(5 fields) COMMAND...`. Lines that do not
//! fit are skipped, never fatal to the batch.

use std::sync::LazyLock;

use regex::Regex;

use super::aggregate::ProcessMetrics;
use super::process::{ProcessRecord, RunState};

/// pid, ppid, cpu, mem, state, five lstart fields, and at least one command word.
pub const TABLE_MIN_FIELDS: usize = 11;
const START_TIME_FIELDS: std::ops::Range<usize> = 5..10;

static CWD_ARG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"--cwd[= ](\S+)").expect("static regex"));

pub fn parse_table_line(line: &str) -> Option<ProcessRecord> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() < TABLE_MIN_FIELDS {
        return None;
    }

    let pid = parts[0].parse::<u32>().ok()?;
    let ppid = parts[1].parse::<u32>().ok()?;
    let cpu = parse_percent(parts[2])?;
    let mem = parse_percent(parts[3])?;
    let state = RunState::from_state_code(parts[4]);
    let start_time = parts[START_TIME_FIELDS].join(" ");

    let executable = parts[10];
    let command = executable
        .rsplit('/')
        .next()
        .unwrap_or(executable)
        .to_string();
    let args = parts[11..].join(" ");
    let working_dir = cwd_from_args(&args).unwrap_or_default();

    Some(ProcessRecord {
        pid,
        ppid,
        cpu_percent: cpu,
        mem_percent: mem,
        total_cpu_percent: cpu,
        total_mem_percent: mem,
        state,
        command,
        args,
        start_time,
        working_dir,
        descendants: Vec::new(),
    })
}

/// `PID PPID`
pub fn parse_link_line(line: &str) -> Option<(u32, u32)> {
    let mut parts = line.split_whitespace();
    let pid = parts.next()?.parse().ok()?;
    let ppid = parts.next()?.parse().ok()?;
    Some((pid, ppid))
}

/// `PID %CPU %MEM`
pub fn parse_metrics_line(line: &str) -> Option<(u32, ProcessMetrics)> {
    let mut parts = line.split_whitespace();
    let pid = parts.next()?.parse().ok()?;
    let cpu = parse_percent(parts.next()?)?;
    let mem = parse_percent(parts.next()?)?;
    Some((pid, ProcessMetrics { cpu, mem }))
}

pub fn cwd_from_args(args: &str) -> Option<String> {
    CWD_ARG
        .captures(args)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

fn parse_percent(field: &str) -> Option<f32> {
    let value = field.parse::<f32>().ok()?;
    (value.is_finite() && value >= 0.0).then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    const LINE: &str =
        "  4242  4100  5.0  1.2 S+   Mon Jan  1 12:00:00 2024 /usr/local/bin/claude --cwd=/home/dev/api --verbose";

    #[test]
    fn parses_full_table_line() {
        let record = parse_table_line(LINE).unwrap();
        assert_eq!(record.pid, 4242);
        assert_eq!(record.ppid, 4100);
        assert_eq!(record.cpu_percent, 5.0);
        assert_eq!(record.mem_percent, 1.2);
        assert_eq!(record.total_cpu_percent, 5.0);
        assert_eq!(record.state, RunState::Running);
        assert_eq!(record.start_time, "Mon Jan 1 12:00:00 2024");
        assert_eq!(record.command, "claude");
        assert_eq!(record.args, "--cwd=/home/dev/api --verbose");
        assert_eq!(record.working_dir, "/home/dev/api");
        assert!(record.descendants.is_empty());
    }

    #[test]
    fn stopped_process_is_paused() {
        let line = "10 1 0.0 0.4 T Tue Feb 13 09:15:42 2024 node /opt/bin/claude";
        let record = parse_table_line(line).unwrap();
        assert_eq!(record.state, RunState::Paused);
        assert_eq!(record.command, "node");
        assert_eq!(record.args, "/opt/bin/claude");
        assert!(record.working_dir.is_empty());
    }

    #[test]
    fn short_or_garbled_lines_are_skipped() {
        assert!(parse_table_line("").is_none());
        assert!(parse_table_line("10 1 0.0 0.4 S Mon Jan 1 12:00:00").is_none());
        assert!(parse_table_line("PID PPID %CPU %MEM S Mon Jan 1 12:00:00 2024 cmd").is_none());
        assert!(parse_table_line("10 1 nan 0.4 S Mon Jan 1 12:00:00 2024 cmd").is_none());
        assert!(parse_table_line("10 1 -2 0.4 S Mon Jan 1 12:00:00 2024 cmd").is_none());
    }

    #[test]
    fn cwd_accepts_space_separated_form() {
        assert_eq!(
            cwd_from_args("--cwd /srv/app --print").as_deref(),
            Some("/srv/app")
        );
        assert_eq!(cwd_from_args("--print"), None);
    }

    #[test]
    fn link_and_metric_lines() {
        assert_eq!(parse_link_line("  12   1"), Some((12, 1)));
        assert_eq!(parse_link_line("  PID  PPID"), None);
        assert_eq!(parse_link_line("12"), None);

        let (pid, metrics) = parse_metrics_line(" 77  3.5  0.8").unwrap();
        assert_eq!(pid, 77);
        assert_eq!(metrics, ProcessMetrics { cpu: 3.5, mem: 0.8 });
        assert!(parse_metrics_line("77 3.5").is_none());
    }
}

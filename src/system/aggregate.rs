use std::collections::HashMap;

use super::process::ProcessRecord;
use super::tree::ProcessTree;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ProcessMetrics {
    pub cpu: f32,
    pub mem: f32,
}

/// Raw cpu/mem for every process on the system, keyed by pid. Comes from its
/// own OS query, so it may disagree slightly with the tree it is combined
/// with: a child that exited in between still contributes its last reading,
/// and one spawned in between is missing from the index and contributes zero.
#[derive(Clone, Debug, Default)]
pub struct ProcessMetricsIndex {
    by_pid: HashMap<u32, ProcessMetrics>,
}

impl ProcessMetricsIndex {
    pub fn get(&self, pid: u32) -> Option<ProcessMetrics> {
        self.by_pid.get(&pid).copied()
    }

    pub fn len(&self) -> usize {
        self.by_pid.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_pid.is_empty()
    }
}

impl FromIterator<(u32, ProcessMetrics)> for ProcessMetricsIndex {
    fn from_iter<T: IntoIterator<Item = (u32, ProcessMetrics)>>(iter: T) -> Self {
        Self {
            by_pid: iter.into_iter().collect(),
        }
    }
}

/// Sum of the metrics of `pids`; pids missing from the index count as zero.
pub fn sum_metrics(pids: &[u32], index: &ProcessMetricsIndex) -> ProcessMetrics {
    pids.iter()
        .filter_map(|&pid| index.get(pid))
        .fold(ProcessMetrics::default(), |acc, m| ProcessMetrics {
            cpu: acc.cpu + m.cpu,
            mem: acc.mem + m.mem,
        })
}

/// Fills `descendants` from `tree` and recomputes subtree totals for one
/// record. Totals always start from the record's own usage, so applying this
/// twice with the same inputs gives the same result.
pub fn aggregate_record(record: &mut ProcessRecord, tree: &ProcessTree, index: &ProcessMetricsIndex) {
    record.descendants = tree.descendants_of(record.pid);
    let children = sum_metrics(&record.descendants, index);
    record.total_cpu_percent = record.cpu_percent + children.cpu;
    record.total_mem_percent = record.mem_percent + children.mem;
}

pub fn aggregate(records: &mut [ProcessRecord], tree: &ProcessTree, index: &ProcessMetricsIndex) {
    for record in records.iter_mut() {
        aggregate_record(record, tree, index);
    }
}

/// Descending by total CPU. `sort_by` is stable, so equal totals keep their
/// input order.
pub fn sort_by_total_cpu(records: &mut [ProcessRecord]) {
    records.sort_by(|a, b| {
        b.total_cpu_percent
            .partial_cmp(&a.total_cpu_percent)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}

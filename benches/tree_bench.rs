use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use clauditor::system::aggregate::{ProcessMetrics, ProcessMetricsIndex, aggregate};
use clauditor::system::process::{ProcessRecord, RunState};
use clauditor::system::tree::build_tree;

/// Binary-heap shaped parentage: pid i's parent is i / 2.
fn make_links(n: usize) -> Vec<(u32, u32)> {
    (0..n)
        .map(|i| {
            let pid = i as u32 + 1;
            let ppid = if i == 0 { 0 } else { (i as u32 / 2) + 1 };
            (pid, ppid)
        })
        .collect()
}

fn make_metrics(n: usize) -> ProcessMetricsIndex {
    (0..n)
        .map(|i| {
            (
                i as u32 + 1,
                ProcessMetrics {
                    cpu: (i % 100) as f32 * 0.1,
                    mem: (i % 10) as f32 * 0.05,
                },
            )
        })
        .collect()
}

fn make_sessions(n: usize) -> Vec<ProcessRecord> {
    // Every 50th process is a monitored session.
    (0..n)
        .step_by(50)
        .map(|i| ProcessRecord {
            pid: i as u32 + 1,
            ppid: 0,
            cpu_percent: 1.0,
            mem_percent: 0.5,
            total_cpu_percent: 1.0,
            total_mem_percent: 0.5,
            state: RunState::Running,
            command: "claude".to_string(),
            args: String::new(),
            start_time: String::new(),
            working_dir: String::new(),
            descendants: Vec::new(),
        })
        .collect()
}

fn bench_build_tree(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_tree");
    for &n in &[500usize, 1000, 2000] {
        let links = make_links(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &links, |b, links| {
            b.iter(|| build_tree(black_box(links.iter().copied())))
        });
    }
    group.finish();
}

fn bench_descendants(c: &mut Criterion) {
    let mut group = c.benchmark_group("descendants_of");
    for &n in &[500usize, 1000, 2000] {
        let tree = build_tree(make_links(n));
        group.bench_with_input(BenchmarkId::from_parameter(n), &tree, |b, tree| {
            b.iter(|| tree.descendants_of(black_box(1)))
        });
    }
    group.finish();
}

fn bench_aggregate(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregate");
    for &n in &[500usize, 1000, 2000] {
        let tree = build_tree(make_links(n));
        let metrics = make_metrics(n);
        let sessions = make_sessions(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &sessions, |b, sessions| {
            b.iter(|| {
                let mut records = sessions.clone();
                aggregate(black_box(&mut records), &tree, &metrics);
                records
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_build_tree, bench_descendants, bench_aggregate);
criterion_main!(benches);

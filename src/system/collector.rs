use std::sync::Arc;

use futures::future::join_all;
use tokio::task::spawn_blocking;

use super::aggregate::{ProcessMetricsIndex, aggregate, sort_by_total_cpu};
use super::identify::Identifier;
use super::process::ProcessRecord;
use super::snapshot::parse_table_line;
use super::source::ProcessSource;
use super::tree::{ProcessTree, build_tree};

/// Runs one refresh tick. Cheap to clone; every `refresh` call works on its
/// own snapshots, so ticks may overlap freely.
#[derive(Clone)]
pub struct Collector {
    source: Arc<dyn ProcessSource>,
    identifier: Arc<Identifier>,
}

impl Collector {
    pub fn new(source: Arc<dyn ProcessSource>, identifier: Identifier) -> Self {
        Collector {
            source,
            identifier: Arc::new(identifier),
        }
    }

    pub fn source(&self) -> Arc<dyn ProcessSource> {
        Arc::clone(&self.source)
    }

    /// Monitored sessions, descending by subtree CPU.
    pub async fn refresh(&self) -> Vec<ProcessRecord> {
        let source = self.source();
        let identifier = Arc::clone(&self.identifier);
        let mut records = spawn_blocking(move || {
            source
                .process_table()
                .iter()
                .filter(|line| identifier.is_monitored(line))
                .filter_map(|line| parse_table_line(line))
                .collect::<Vec<_>>()
        })
        .await
        .unwrap_or_default();

        if records.is_empty() {
            tracing::debug!("no monitored processes found");
            return records;
        }

        let tree_source = self.source();
        let metrics_source = self.source();
        let (tree, metrics) = tokio::join!(
            spawn_blocking(move || build_tree(tree_source.parent_links())),
            spawn_blocking(move || metrics_source.metrics()),
        );
        let tree: ProcessTree = tree.unwrap_or_default();
        let metrics: ProcessMetricsIndex = metrics.unwrap_or_default();

        self.resolve_working_dirs(&mut records).await;
        aggregate(&mut records, &tree, &metrics);
        sort_by_total_cpu(&mut records);

        tracing::debug!(
            sessions = records.len(),
            indexed = metrics.len(),
            "refresh complete"
        );
        records
    }

    /// Looks up the cwd of every record that did not carry `--cwd`, one
    /// blocking task per process, joined before returning.
    async fn resolve_working_dirs(&self, records: &mut [ProcessRecord]) {
        let lookups = records
            .iter()
            .enumerate()
            .filter(|(_, record)| record.working_dir.is_empty())
            .map(|(index, record)| {
                let source = self.source();
                let pid = record.pid;
                async move {
                    let cwd = spawn_blocking(move || source.cwd(pid))
                        .await
                        .unwrap_or_default();
                    (index, cwd)
                }
            });

        for (index, cwd) in join_all(lookups).await {
            records[index].working_dir = cwd;
        }
    }
}

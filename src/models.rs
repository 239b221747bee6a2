use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use crate::topology::TargetKind;

/// The closed set of collectors, in their fixed execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CollectorKind {
    ConfigSnapshot,
    ServerLog,
    ThreadDump,
    JvmReport,
    HeapDump,
}

impl fmt::Display for CollectorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CollectorKind::ConfigSnapshot => write!(f, "config-snapshot"),
            CollectorKind::ServerLog => write!(f, "server-log"),
            CollectorKind::ThreadDump => write!(f, "thread-dump"),
            CollectorKind::JvmReport => write!(f, "jvm-report"),
            CollectorKind::HeapDump => write!(f, "heap-dump"),
        }
    }
}

/// Per-collector outcome. Skips and failures are data, not errors; a
/// failed collector never aborts the run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Collected { files: Vec<PathBuf> },
    Skipped { reason: String },
    Failed { reason: String },
}

impl Outcome {
    pub fn skipped(reason: impl Into<String>) -> Self {
        Outcome::Skipped {
            reason: reason.into(),
        }
    }

    pub fn failed(reason: impl Into<String>) -> Self {
        Outcome::Failed {
            reason: reason.into(),
        }
    }

    pub fn is_collected(&self) -> bool {
        matches!(self, Outcome::Collected { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Outcome::Failed { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportEntry {
    pub collector: CollectorKind,
    pub outcome: Outcome,
}

/// Aggregated result of one collection pass, owned by the orchestrator.
#[derive(Debug, Clone, Serialize)]
pub struct CollectionReport {
    pub collection_id: String,
    pub target: String,
    pub target_kind: TargetKind,
    pub output_dir: PathBuf,
    pub started: String,
    pub finished: String,
    pub entries: Vec<ReportEntry>,
}

impl CollectionReport {
    pub fn collected_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.outcome.is_collected())
            .count()
    }

    pub fn failed_entries(&self) -> impl Iterator<Item = &ReportEntry> {
        self.entries
            .iter()
            .filter(|entry| entry.outcome.is_failed())
    }

    pub fn outcome_of(&self, collector: CollectorKind) -> Option<&Outcome> {
        self.entries
            .iter()
            .find(|entry| entry.collector == collector)
            .map(|entry| &entry.outcome)
    }
}

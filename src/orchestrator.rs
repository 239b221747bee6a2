//! Collection orchestration: one bounded, synchronous pass.
//!
//! `Start → resolve target → (not found → abort) | build context →
//! run collectors in declared order → aggregate`. Collectors are
//! independent; every outcome is recorded and a failure never stops the
//! collectors after it. The only fatal condition is a target name that
//! resolves to nothing.

use std::fmt;
use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context as _, Result};
use chrono::Utc;
use log::{info, warn};
use uuid::Uuid;

use crate::collectors::{
    Collector, ConfigSnapshotCollector, HeapDumpCollector, JvmReportCollector,
    ServerLogCollector, ThreadDumpCollector,
};
use crate::context::{build_context, CollectionContext, CollectionFlags};
use crate::models::{CollectionReport, Outcome, ReportEntry};
use crate::topology::{resolve_target, Topology};

/// The target name did not match the domain, any instance, deployment
/// group or cluster. Fatal: no context is built and nothing is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetNotFound {
    pub target: String,
}

impl fmt::Display for TargetNotFound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Target '{}' does not match the domain, an instance, a deployment group or a cluster",
            self.target
        )
    }
}

impl std::error::Error for TargetNotFound {}

/// Owns the ordered collector list and runs one collection pass.
pub struct CollectorService {
    ctx: CollectionContext,
}

impl CollectorService {
    pub fn new(ctx: CollectionContext) -> Self {
        CollectorService { ctx }
    }

    fn collectors() -> Vec<Box<dyn Collector>> {
        vec![
            Box::new(ConfigSnapshotCollector),
            Box::new(ServerLogCollector),
            Box::new(ThreadDumpCollector),
            Box::new(JvmReportCollector),
            Box::new(HeapDumpCollector),
        ]
    }

    /// Run every collector in declared order, recording each outcome
    /// regardless of prior failures.
    pub fn execute_collection(&self) -> CollectionReport {
        let started = Utc::now();
        let mut entries = Vec::new();

        for collector in Self::collectors() {
            let kind = collector.kind();
            info!("Running {} collector", kind);
            let outcome = collector.collect(&self.ctx);
            match &outcome {
                Outcome::Collected { files } => {
                    info!("{}: collected {} file(s)", kind, files.len())
                }
                Outcome::Skipped { reason } => info!("{}: skipped ({})", kind, reason),
                Outcome::Failed { reason } => warn!("{}: failed ({})", kind, reason),
            }
            entries.push(ReportEntry {
                collector: kind,
                outcome,
            });
        }

        CollectionReport {
            collection_id: Uuid::new_v4().to_string(),
            target: self.ctx.target.clone(),
            target_kind: self.ctx.target_kind,
            output_dir: self.ctx.output_dir.clone(),
            started: started.to_rfc3339(),
            finished: Utc::now().to_rfc3339(),
            entries,
        }
    }
}

/// Resolve the target, assemble the context, and run the pipeline.
///
/// Returns `Err(TargetNotFound)` before any filesystem write when the
/// target is unknown; every other problem surfaces as a per-collector
/// outcome inside the returned report.
#[allow(clippy::too_many_arguments)]
pub fn run_collection(
    target: &str,
    flags: &CollectionFlags,
    dump_timeout: Duration,
    topology: &Topology,
    install_root: &Path,
    domain_root: &Path,
    output_dir: &Path,
) -> Result<CollectionReport> {
    let kind = resolve_target(target, topology).ok_or_else(|| TargetNotFound {
        target: target.to_string(),
    })?;
    info!("Resolved target '{}' as {}", target, kind);

    fs::create_dir_all(output_dir).context(format!(
        "Failed to create output directory: {}",
        output_dir.display()
    ))?;
    // Heap dumps are written by the target JVM, not this process, so the
    // output directory handed to collectors must be absolute.
    let output_dir = fs::canonicalize(output_dir).context(format!(
        "Failed to canonicalize output directory: {}",
        output_dir.display()
    ))?;

    let ctx = build_context(
        *flags,
        dump_timeout,
        target,
        kind,
        topology,
        install_root,
        domain_root,
        &output_dir,
    );
    Ok(CollectorService::new(ctx).execute_collection())
}

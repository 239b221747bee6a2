//! JVM report collector.
//!
//! Captures `jcmd <pid> VM.info` (runtime flags, heap layout, loaded
//! libraries, recent events) for each running process in scope.

use std::fs;

use log::{debug, warn};

use crate::collectors::collector::{capture_targets, read_instance_pid, run_jcmd, Collector};
use crate::context::CollectionContext;
use crate::models::{CollectorKind, Outcome};

pub struct JvmReportCollector;

impl Collector for JvmReportCollector {
    fn kind(&self) -> CollectorKind {
        CollectorKind::JvmReport
    }

    fn collect(&self, ctx: &CollectionContext) -> Outcome {
        if !ctx.flags.jvm_report {
            return Outcome::skipped("disabled by flag");
        }

        let mut files = Vec::new();
        let mut failures = Vec::new();

        for (name, home) in capture_targets(ctx) {
            let pid = match read_instance_pid(&home) {
                Ok(pid) => pid,
                Err(e) => {
                    debug!("Skipping JVM report for {}: {:#}", name, e);
                    continue;
                }
            };
            match run_jcmd(pid, &["VM.info"], ctx.dump_timeout) {
                Ok(report) => {
                    let dest = ctx.output_dir.join(format!("jvm-report-{}.txt", name));
                    match fs::write(&dest, report) {
                        Ok(()) => files.push(dest),
                        Err(e) => failures.push(format!("{}: {}", name, e)),
                    }
                }
                Err(e) => failures.push(format!("{}: {:#}", name, e)),
            }
        }

        if files.is_empty() {
            if failures.is_empty() {
                return Outcome::skipped("no running instances found");
            }
            return Outcome::failed(failures.join("; "));
        }
        for failure in &failures {
            warn!("jvm-report: {}", failure);
        }
        Outcome::Collected { files }
    }
}

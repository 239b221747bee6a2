//! Heap dump collector.
//!
//! Triggers `jcmd <pid> GC.heap_dump` for each running process in scope.
//! The JVM writes the `.hprof` file itself, so the destination path must
//! be absolute; the orchestrator canonicalizes the output directory
//! before the context is built.

use log::{debug, warn};

use crate::collectors::collector::{capture_targets, read_instance_pid, run_jcmd, Collector};
use crate::context::CollectionContext;
use crate::models::{CollectorKind, Outcome};

pub struct HeapDumpCollector;

impl Collector for HeapDumpCollector {
    fn kind(&self) -> CollectorKind {
        CollectorKind::HeapDump
    }

    fn collect(&self, ctx: &CollectionContext) -> Outcome {
        if !ctx.flags.heap_dump {
            return Outcome::skipped("disabled by flag");
        }

        let mut files = Vec::new();
        let mut failures = Vec::new();

        for (name, home) in capture_targets(ctx) {
            let pid = match read_instance_pid(&home) {
                Ok(pid) => pid,
                Err(e) => {
                    debug!("Skipping heap dump for {}: {:#}", name, e);
                    continue;
                }
            };
            let dest = ctx.output_dir.join(format!("heap-dump-{}.hprof", name));
            let dest_arg = dest.to_string_lossy().to_string();
            match run_jcmd(pid, &["GC.heap_dump", &dest_arg], ctx.dump_timeout) {
                Ok(_) if dest.exists() => files.push(dest),
                Ok(_) => failures.push(format!(
                    "{}: jcmd reported success but {} was not written",
                    name,
                    dest.display()
                )),
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
            warn!("heap-dump: {}", failure);
        }
        Outcome::Collected { files }
    }
}

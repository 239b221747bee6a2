//! Thread dump collector.
//!
//! Captures `jcmd <pid> Thread.print` for the DAS and every in-scope
//! instance whose pid file is readable, writing one text file per
//! process under the output directory.

use std::fs;

use log::{debug, warn};

use crate::collectors::collector::{capture_targets, read_instance_pid, run_jcmd, Collector};
use crate::context::CollectionContext;
use crate::models::{CollectorKind, Outcome};

pub struct ThreadDumpCollector;

impl Collector for ThreadDumpCollector {
    fn kind(&self) -> CollectorKind {
        CollectorKind::ThreadDump
    }

    fn collect(&self, ctx: &CollectionContext) -> Outcome {
        if !ctx.flags.thread_dump {
            return Outcome::skipped("disabled by flag");
        }

        let mut files = Vec::new();
        let mut failures = Vec::new();

        for (name, home) in capture_targets(ctx) {
            let pid = match read_instance_pid(&home) {
                Ok(pid) => pid,
                Err(e) => {
                    debug!("Skipping thread dump for {}: {:#}", name, e);
                    continue;
                }
            };
            match run_jcmd(pid, &["Thread.print", "-l"], ctx.dump_timeout) {
                Ok(dump) => {
                    let dest = ctx.output_dir.join(format!("thread-dump-{}.txt", name));
                    match fs::write(&dest, dump) {
                        Ok(()) => files.push(dest),
                        Err(e) => failures.push(format!("{}: {}", name, e)),
                    }
                }
                Err(e) => failures.push(format!("{}: {:#}", name, e)),
            }
        }

        finish(files, failures)
    }
}

fn finish(files: Vec<std::path::PathBuf>, failures: Vec<String>) -> Outcome {
    if files.is_empty() {
        if failures.is_empty() {
            return Outcome::skipped("no running instances found");
        }
        return Outcome::failed(failures.join("; "));
    }
    for failure in &failures {
        warn!("thread-dump: {}", failure);
    }
    Outcome::Collected { files }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{build_context, CollectionFlags};
    use crate::test_utils::{create_domain_layout, create_temp_dir};
    use crate::topology::{TargetKind, Topology};
    use std::time::Duration;

    #[test]
    fn no_pid_files_means_skipped() {
        let scratch = create_temp_dir().unwrap();
        let domain_root = create_domain_layout(scratch.path(), "domain1").unwrap();
        let output = scratch.path().join("out");

        let topology = Topology::single_das("domain1");
        let ctx = build_context(
            CollectionFlags::default(),
            Duration::from_secs(1),
            "domain",
            TargetKind::Domain,
            &topology,
            scratch.path(),
            &domain_root,
            &output,
        );

        match ThreadDumpCollector.collect(&ctx) {
            Outcome::Skipped { reason } => assert!(reason.contains("no running instances")),
            other => panic!("expected skip, got {:?}", other),
        }
        assert!(!output.exists());
    }

    #[test]
    fn disabled_flag_skips() {
        let scratch = create_temp_dir().unwrap();
        let domain_root = create_domain_layout(scratch.path(), "domain1").unwrap();
        let topology = Topology::single_das("domain1");
        let ctx = build_context(
            CollectionFlags::none(),
            Duration::from_secs(1),
            "domain",
            TargetKind::Domain,
            &topology,
            scratch.path(),
            &domain_root,
            &scratch.path().join("out"),
        );
        assert!(matches!(
            ThreadDumpCollector.collect(&ctx),
            Outcome::Skipped { .. }
        ));
    }

    #[test]
    fn unreachable_pid_is_a_failure_not_an_abort() {
        let scratch = create_temp_dir().unwrap();
        let domain_root = create_domain_layout(scratch.path(), "domain1").unwrap();
        let output = scratch.path().join("out");
        std::fs::create_dir_all(&output).unwrap();

        // A pid that cannot correspond to a running JVM: either jcmd is
        // absent or it reports the process as gone. Both are failures.
        std::fs::write(domain_root.join("config").join("pid"), "999999999\n").unwrap();

        let topology = Topology::single_das("domain1");
        let ctx = build_context(
            CollectionFlags::default(),
            Duration::from_secs(5),
            "domain",
            TargetKind::Domain,
            &topology,
            scratch.path(),
            &domain_root,
            &output,
        );

        assert!(ThreadDumpCollector.collect(&ctx).is_failed());
    }
}

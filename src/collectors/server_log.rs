//! Server log collector.
//!
//! Stages the domain's own log directory plus every in-scope instance's
//! log directory under the output directory, one subtree per instance.

use log::warn;

use crate::collectors::collector::{copy_to_destination, Collector};
use crate::context::CollectionContext;
use crate::models::{CollectorKind, Outcome};

pub struct ServerLogCollector;

impl Collector for ServerLogCollector {
    fn kind(&self) -> CollectorKind {
        CollectorKind::ServerLog
    }

    fn collect(&self, ctx: &CollectionContext) -> Outcome {
        if !ctx.flags.server_log {
            return Outcome::skipped("disabled by flag");
        }

        let mut files = Vec::new();
        let mut problems = Vec::new();

        if ctx.domain_logs_dir.is_dir() {
            match copy_to_destination(&ctx.domain_logs_dir, &ctx.output_dir) {
                Ok(dest) => files.push(dest),
                Err(e) => problems.push(format!("domain logs: {:#}", e)),
            }
        } else {
            problems.push(format!(
                "domain log directory {} does not exist",
                ctx.domain_logs_dir.display()
            ));
        }

        for log_dir in &ctx.instance_log_paths {
            let Some(instance) = instance_name_of(log_dir) else {
                continue;
            };
            if !log_dir.is_dir() {
                problems.push(format!(
                    "{}: log directory {} does not exist",
                    instance,
                    log_dir.display()
                ));
                continue;
            }
            match copy_to_destination(log_dir, &ctx.output_dir.join(&instance)) {
                Ok(dest) => files.push(dest),
                Err(e) => problems.push(format!("{}: {:#}", instance, e)),
            }
        }

        if files.is_empty() {
            return Outcome::failed(problems.join("; "));
        }
        for problem in &problems {
            warn!("server-log: {}", problem);
        }
        Outcome::Collected { files }
    }
}

/// The instance name component of `<base>/<instance>/logs`.
fn instance_name_of(path: &std::path::Path) -> Option<String> {
    path.parent()?
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
}

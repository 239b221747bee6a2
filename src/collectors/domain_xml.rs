//! Configuration snapshot collector.
//!
//! Copies the DAS `domain.xml` into the output directory and, best
//! effort, each in-scope instance's local copy. The snapshot is an
//! optional artifact: a missing source yields a skip, never a failure.

use log::{debug, warn};

use crate::collectors::collector::{copy_to_destination, Collector};
use crate::context::CollectionContext;
use crate::models::{CollectorKind, Outcome};

pub struct ConfigSnapshotCollector;

impl Collector for ConfigSnapshotCollector {
    fn kind(&self) -> CollectorKind {
        CollectorKind::ConfigSnapshot
    }

    fn collect(&self, ctx: &CollectionContext) -> Outcome {
        if !ctx.flags.domain_xml {
            return Outcome::skipped("disabled by flag");
        }
        let Some(source) = &ctx.domain_xml_path else {
            return Outcome::skipped("no domain.xml path resolved");
        };
        if !source.exists() {
            return Outcome::skipped(format!("{} does not exist", source.display()));
        }

        let mut files = match copy_to_destination(source, &ctx.output_dir) {
            Ok(dest) => vec![dest],
            Err(e) => return Outcome::failed(format!("{:#}", e)),
        };

        // Instance copies are best effort: instances may never have been
        // synchronized, or their node may be gone.
        for path in &ctx.instance_domain_xml_paths {
            if !path.exists() {
                debug!("No instance domain.xml at {}", path.display());
                continue;
            }
            let Some(instance) = instance_name_of(path) else {
                continue;
            };
            let dest_dir = ctx.output_dir.join(&instance).join("config");
            match copy_to_destination(path, &dest_dir) {
                Ok(dest) => files.push(dest),
                Err(e) => warn!(
                    "Failed to copy instance domain.xml for {}: {:#}",
                    instance, e
                ),
            }
        }

        Outcome::Collected { files }
    }
}

/// The instance name component of `<base>/<instance>/config/domain.xml`.
fn instance_name_of(path: &std::path::Path) -> Option<String> {
    path.parent()?
        .parent()?
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
}

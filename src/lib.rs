//! # diag_collector
//!
//! Diagnostics collection for distributed application-server domains.
//!
//! The crate resolves a user-supplied target name against the domain
//! topology (the whole domain, a single instance, a cluster, or a
//! deployment group), derives per-node filesystem paths for every
//! participating instance, and runs an ordered set of collectors
//! (configuration snapshot, server logs, thread dumps, JVM reports,
//! heap dumps) against a shared read-only context. Individual collector
//! failures are recorded and never abort the run; only an unresolvable
//! target is fatal.
//!
//! ```no_run
//! use std::path::Path;
//! use std::time::Duration;
//!
//! use diag_collector::context::CollectionFlags;
//! use diag_collector::orchestrator::run_collection;
//! use diag_collector::topology::Topology;
//!
//! # fn main() -> anyhow::Result<()> {
//! let topology = Topology::from_yaml_file(Path::new("topology.yaml"))?;
//! let report = run_collection(
//!     "domain",
//!     &CollectionFlags::default(),
//!     Duration::from_secs(60),
//!     &topology,
//!     Path::new("/opt/appserver"),
//!     Path::new("/opt/appserver/glassfish/domains/domain1"),
//!     Path::new("/tmp/diag-out"),
//! )?;
//! println!("{} collectors ran", report.entries.len());
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod collectors;
pub mod context;
pub mod models;
pub mod orchestrator;
pub mod topology;
pub mod utils;

#[cfg(test)]
mod test_utils;

use clap::{ArgAction, Parser};
use std::path::PathBuf;

use crate::context::CollectionFlags;

/// Command-line arguments for the diagnostics collection tool.
///
/// The five collector toggles take an explicit boolean value
/// (`--server-log false`) and default to enabled, matching the
/// admin-command parameter convention.
#[derive(Parser, Debug)]
#[clap(
    name = "collect-diagnostics",
    about = "Collect diagnostics from an application-server domain"
)]
pub struct Args {
    /// Target to collect for: "domain", an instance name, a cluster
    /// name, or a deployment-group name
    #[clap(default_value = "domain")]
    pub target: String,

    /// Domain name, used to locate the configuration source file
    #[clap(long, default_value = "domain1")]
    pub domain_name: String,

    /// Product installation root; substituted for the install-dir
    /// placeholder in node definitions
    #[clap(long, default_value = ".")]
    pub install_dir: PathBuf,

    /// Topology document (YAML) describing nodes, instances, clusters
    /// and deployment groups; without it only the DAS is known
    #[clap(long)]
    pub topology: Option<PathBuf>,

    /// Output directory for collected artifacts
    /// (default: <tmp>/diag-collect-<timestamp>)
    #[clap(short, long)]
    pub output: Option<PathBuf>,

    /// Collect the configuration snapshot (domain.xml)
    #[clap(long, default_value_t = true, action = ArgAction::Set)]
    pub domain_xml: bool,

    /// Collect server log files
    #[clap(long, default_value_t = true, action = ArgAction::Set)]
    pub server_log: bool,

    /// Capture thread dumps from running instances
    #[clap(long, default_value_t = true, action = ArgAction::Set)]
    pub thread_dump: bool,

    /// Capture JVM reports from running instances
    #[clap(long, default_value_t = true, action = ArgAction::Set)]
    pub jvm_report: bool,

    /// Capture heap dumps from running instances
    #[clap(long, default_value_t = true, action = ArgAction::Set)]
    pub heap_dump: bool,

    /// Timeout in seconds for each live capture (thread dump, heap
    /// dump, JVM report)
    #[clap(long, default_value_t = 60)]
    pub dump_timeout_secs: u64,

    /// Verbose logging
    #[clap(short, long)]
    pub verbose: bool,
}

impl Args {
    pub fn flags(&self) -> CollectionFlags {
        CollectionFlags {
            domain_xml: self.domain_xml,
            server_log: self.server_log,
            thread_dump: self.thread_dump,
            jvm_report: self.jvm_report,
            heap_dump: self.heap_dump,
        }
    }

    /// Conventional domain root under the product installation.
    pub fn domain_root(&self) -> PathBuf {
        self.install_dir
            .join("glassfish")
            .join("domains")
            .join(&self.domain_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_enable_every_collector() {
        let args = Args::parse_from(["collect-diagnostics"]);
        assert_eq!(args.target, "domain");
        assert_eq!(args.domain_name, "domain1");
        let flags = args.flags();
        assert!(flags.domain_xml && flags.server_log && flags.thread_dump);
        assert!(flags.jvm_report && flags.heap_dump);
    }

    #[test]
    fn toggles_accept_explicit_false() {
        let args = Args::parse_from([
            "collect-diagnostics",
            "inst1",
            "--heap-dump",
            "false",
            "--thread-dump",
            "false",
        ]);
        assert_eq!(args.target, "inst1");
        let flags = args.flags();
        assert!(!flags.heap_dump);
        assert!(!flags.thread_dump);
        assert!(flags.server_log);
    }

    #[test]
    fn domain_root_follows_convention() {
        let args = Args::parse_from([
            "collect-diagnostics",
            "--install-dir",
            "/opt/appserver",
            "--domain-name",
            "prod",
        ]);
        assert_eq!(
            args.domain_root(),
            PathBuf::from("/opt/appserver/glassfish/domains/prod")
        );
    }
}

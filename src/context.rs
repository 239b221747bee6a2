//! Collection Context assembly.
//!
//! The context is the only thing collectors see: an immutable bag of
//! resolved paths, toggle flags and topology-derived lists. It is built
//! once, after target resolution and before any collector runs, and is
//! never mutated afterwards. Assembly is pure path construction; absent
//! optional data becomes an empty container, never an error.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::topology::{
    instance_home_dirs, resolve_instance_paths, resolve_node_paths, standalone_instances,
    Cluster, DeploymentGroup, Instance, Node, PathKind, TargetKind, Topology,
};

/// Per-collector enable flags. Everything defaults to enabled, matching
/// the admin-command parameter defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectionFlags {
    pub domain_xml: bool,
    pub server_log: bool,
    pub thread_dump: bool,
    pub jvm_report: bool,
    pub heap_dump: bool,
}

impl Default for CollectionFlags {
    fn default() -> Self {
        CollectionFlags {
            domain_xml: true,
            server_log: true,
            thread_dump: true,
            jvm_report: true,
            heap_dump: true,
        }
    }
}

impl CollectionFlags {
    pub fn none() -> Self {
        CollectionFlags {
            domain_xml: false,
            server_log: false,
            thread_dump: false,
            jvm_report: false,
            heap_dump: false,
        }
    }
}

/// Immutable parameter context shared by every collector.
#[derive(Debug, Clone)]
pub struct CollectionContext {
    pub target: String,
    pub target_kind: TargetKind,
    pub domain_name: String,
    pub flags: CollectionFlags,
    pub dump_timeout: Duration,
    pub output_dir: PathBuf,

    /// DAS configuration snapshot source.
    pub domain_xml_path: Option<PathBuf>,
    /// `<base>/<instance>/config/domain.xml` for every in-scope instance.
    pub instance_domain_xml_paths: Vec<PathBuf>,
    /// `<base>/<instance>/logs` for every in-scope instance.
    pub instance_log_paths: Vec<PathBuf>,
    /// The domain's own log directory (DAS logs).
    pub domain_logs_dir: PathBuf,
    /// Domain root, home of the DAS process.
    pub domain_root: PathBuf,
    pub das_name: String,

    pub instance_names: Vec<String>,
    pub standalone_instances: Vec<Instance>,
    pub nodes: Vec<Node>,
    pub clusters: Vec<Cluster>,
    pub deployment_groups: Vec<DeploymentGroup>,
    pub node_paths: BTreeMap<String, PathBuf>,
    /// `(instance, home dir)` for every in-scope instance, used by the
    /// live-capture collectors to locate pid files.
    pub instance_homes: Vec<(String, PathBuf)>,
    /// The resolved instance when the target is a single instance.
    pub target_instance: Option<Instance>,
}

/// Instance names participating in the run for the resolved target kind.
/// `None` means unrestricted (whole domain).
fn target_scope(target: &str, kind: TargetKind, topology: &Topology) -> Option<BTreeSet<String>> {
    match kind {
        TargetKind::Domain => None,
        TargetKind::Instance => Some([target.to_string()].into_iter().collect()),
        TargetKind::Cluster => Some(
            topology
                .cluster(target)
                .map(|cluster| cluster.members.iter().map(|m| m.name.clone()).collect())
                .unwrap_or_default(),
        ),
        TargetKind::DeploymentGroup => Some(
            topology
                .deployment_group(target)
                .map(|group| group.members.iter().map(|m| m.name.clone()).collect())
                .unwrap_or_default(),
        ),
    }
}

#[allow(clippy::too_many_arguments)]
pub fn build_context(
    flags: CollectionFlags,
    dump_timeout: Duration,
    target: &str,
    kind: TargetKind,
    topology: &Topology,
    install_root: &Path,
    domain_root: &Path,
    output_dir: &Path,
) -> CollectionContext {
    let scope = target_scope(target, kind, topology);
    let scope_ref = scope.as_ref();

    let instance_names = match scope_ref {
        None => topology.instance_names(),
        Some(scope) => topology
            .instance_names()
            .into_iter()
            .filter(|name| scope.contains(name))
            .collect(),
    };

    CollectionContext {
        target: target.to_string(),
        target_kind: kind,
        domain_name: topology.domain_name.clone(),
        flags,
        dump_timeout,
        output_dir: output_dir.to_path_buf(),
        domain_xml_path: Some(domain_root.join("config").join("domain.xml")),
        instance_domain_xml_paths: resolve_instance_paths(
            PathKind::DomainXml,
            topology,
            install_root,
            scope_ref,
        ),
        instance_log_paths: resolve_instance_paths(
            PathKind::Log,
            topology,
            install_root,
            scope_ref,
        ),
        domain_logs_dir: domain_root.join("logs"),
        domain_root: domain_root.to_path_buf(),
        das_name: topology
            .das_instance()
            .map(|das| das.name.clone())
            .unwrap_or_else(|| "server".to_string()),
        instance_names,
        standalone_instances: standalone_instances(topology),
        nodes: topology.nodes.clone(),
        clusters: topology.clusters.clone(),
        deployment_groups: topology.deployment_groups.clone(),
        node_paths: resolve_node_paths(topology, install_root),
        instance_homes: instance_home_dirs(topology, install_root, scope_ref),
        target_instance: match kind {
            TargetKind::Instance => topology.find_instance(target).cloned(),
            _ => None,
        },
    }
}

//! Path derivation across heterogeneous node layouts.
//!
//! Every local CONFIG node resolves to one base directory; per-instance
//! configuration and log paths hang off that base. Remote and non-CONFIG
//! nodes are skipped because their filesystem is not reachable from this
//! process; their instances are collected out-of-band or not at all.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use log::debug;

use crate::topology::{Instance, NodeKind, Topology};

/// Placeholder used in node install directories, substituted with the
/// running process's product root.
pub const PRODUCT_ROOT_PLACEHOLDER: &str = "${com.sun.aas.productRoot}";

/// Which per-instance path to derive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathKind {
    /// `<base>/<instance>/config/domain.xml`
    DomainXml,
    /// `<base>/<instance>/logs`
    Log,
}

/// Resolve the base directory of every local CONFIG node.
///
/// An explicit node directory takes precedence; otherwise the base is
/// `<installDir>/glassfish/nodes/<nodeName>` with the product-root
/// placeholder substituted from `install_root`.
pub fn resolve_node_paths(topology: &Topology, install_root: &Path) -> BTreeMap<String, PathBuf> {
    let mut node_paths = BTreeMap::new();
    for node in &topology.nodes {
        if node.kind != NodeKind::Config {
            debug!("Skipping non-CONFIG node {}", node.name);
            continue;
        }
        if !node.local {
            debug!("Skipping remote node {}", node.name);
            continue;
        }
        if let Some(node_dir) = &node.node_dir {
            node_paths.insert(node.name.clone(), node_dir.join(&node.name));
            continue;
        }
        let Some(install_dir) = &node.install_dir else {
            debug!("Node {} has neither node dir nor install dir", node.name);
            continue;
        };
        let substituted =
            install_dir.replace(PRODUCT_ROOT_PLACEHOLDER, &install_root.to_string_lossy());
        node_paths.insert(
            node.name.clone(),
            PathBuf::from(substituted)
                .join("glassfish")
                .join("nodes")
                .join(&node.name),
        );
    }
    node_paths
}

/// Group non-DAS instance names by their owning node, preserving the
/// declaration order of instances within each node.
pub fn instances_by_node(topology: &Topology) -> BTreeMap<String, Vec<String>> {
    let mut by_node: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for instance in &topology.instances {
        if instance.das {
            continue;
        }
        if instance.node_ref.is_empty() {
            continue;
        }
        by_node
            .entry(instance.node_ref.clone())
            .or_default()
            .push(instance.name.clone());
    }
    by_node
}

/// Derive per-instance configuration or log paths for every node that has
/// both a resolved base path and at least one hosted instance. Nodes
/// missing either are silently skipped. The result is deterministic for
/// an unmodified topology.
pub fn resolve_instance_paths(
    kind: PathKind,
    topology: &Topology,
    install_root: &Path,
    scope: Option<&BTreeSet<String>>,
) -> Vec<PathBuf> {
    instance_home_dirs(topology, install_root, scope)
        .into_iter()
        .map(|(_, home)| match kind {
            PathKind::DomainXml => home.join("config").join("domain.xml"),
            PathKind::Log => home.join("logs"),
        })
        .collect()
}

/// Home directory (`<base>/<instance>`) of every locally reachable
/// non-DAS instance, optionally restricted to a set of instance names.
pub fn instance_home_dirs(
    topology: &Topology,
    install_root: &Path,
    scope: Option<&BTreeSet<String>>,
) -> Vec<(String, PathBuf)> {
    let node_paths = resolve_node_paths(topology, install_root);
    let by_node = instances_by_node(topology);
    let mut homes = Vec::new();
    for (node_name, base) in &node_paths {
        let Some(instances) = by_node.get(node_name) else {
            continue;
        };
        for instance in instances {
            if let Some(scope) = scope {
                if !scope.contains(instance) {
                    continue;
                }
            }
            homes.push((instance.clone(), base.join(instance)));
        }
    }
    homes
}

/// Instances belonging to no cluster and no deployment group: start from
/// all hosted instances and remove any whose `(name, node_ref)` pair
/// matches a cluster or deployment-group member.
pub fn standalone_instances(topology: &Topology) -> Vec<Instance> {
    let mut instances: Vec<Instance> = topology.hosted_instances().cloned().collect();
    let members = topology
        .clusters
        .iter()
        .flat_map(|cluster| cluster.members.iter())
        .chain(
            topology
                .deployment_groups
                .iter()
                .flat_map(|group| group.members.iter()),
        );
    for member in members {
        instances
            .retain(|instance| !(instance.name == member.name && instance.node_ref == member.node_ref));
    }
    instances
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::sample_topology;
    use crate::topology::{MemberRef, Node, NodeKind};

    #[test]
    fn node_paths_only_cover_local_config_nodes() {
        let topology = sample_topology();
        let node_paths = resolve_node_paths(&topology, Path::new("/opt/appserver"));
        assert!(node_paths.contains_key("node-a"));
        assert!(node_paths.contains_key("node-b"));
        assert!(!node_paths.contains_key("node-remote"));
        assert!(!node_paths.contains_key("node-ssh"));
    }

    #[test]
    fn explicit_node_dir_takes_precedence() {
        let topology = sample_topology();
        let node_paths = resolve_node_paths(&topology, Path::new("/opt/appserver"));
        assert_eq!(node_paths["node-b"], PathBuf::from("/var/nodes/node-b"));
    }

    #[test]
    fn product_root_placeholder_is_substituted() {
        let topology = sample_topology();
        let node_paths = resolve_node_paths(&topology, Path::new("/opt/appserver"));
        assert_eq!(
            node_paths["node-a"],
            PathBuf::from("/opt/appserver/glassfish/nodes/node-a")
        );
    }

    #[test]
    fn node_without_directories_is_skipped() {
        let mut topology = sample_topology();
        topology.nodes.push(Node {
            name: "node-bare".to_string(),
            kind: NodeKind::Config,
            local: true,
            install_dir: None,
            node_dir: None,
        });
        let node_paths = resolve_node_paths(&topology, Path::new("/opt/appserver"));
        assert!(!node_paths.contains_key("node-bare"));
    }

    #[test]
    fn das_is_never_grouped_by_node() {
        let topology = sample_topology();
        let by_node = instances_by_node(&topology);
        for instances in by_node.values() {
            assert!(!instances.contains(&"server".to_string()));
        }
    }

    #[test]
    fn instance_paths_have_expected_shape() {
        let topology = sample_topology();
        let xml_paths = resolve_instance_paths(
            PathKind::DomainXml,
            &topology,
            Path::new("/opt/appserver"),
            None,
        );
        assert!(xml_paths.contains(&PathBuf::from(
            "/opt/appserver/glassfish/nodes/node-a/inst1/config/domain.xml"
        )));

        let log_paths =
            resolve_instance_paths(PathKind::Log, &topology, Path::new("/opt/appserver"), None);
        assert!(log_paths.contains(&PathBuf::from(
            "/opt/appserver/glassfish/nodes/node-a/inst1/logs"
        )));
        assert_eq!(xml_paths.len(), log_paths.len());
    }

    #[test]
    fn scope_restricts_instances() {
        let topology = sample_topology();
        let scope: BTreeSet<String> = ["inst2".to_string()].into_iter().collect();
        let log_paths = resolve_instance_paths(
            PathKind::Log,
            &topology,
            Path::new("/opt/appserver"),
            Some(&scope),
        );
        assert_eq!(log_paths.len(), 1);
        assert!(log_paths[0].ends_with("inst2/logs"));
    }

    #[test]
    fn path_resolution_is_idempotent() {
        let topology = sample_topology();
        let first =
            resolve_instance_paths(PathKind::Log, &topology, Path::new("/opt/appserver"), None);
        let second =
            resolve_instance_paths(PathKind::Log, &topology, Path::new("/opt/appserver"), None);
        assert_eq!(first, second);
    }

    #[test]
    fn standalone_excludes_cluster_and_group_members() {
        let topology = sample_topology();
        let standalone = standalone_instances(&topology);
        let names: Vec<&str> = standalone.iter().map(|i| i.name.as_str()).collect();
        // inst1 is in web-cluster, inst3 is in dg1.
        assert_eq!(names, vec!["inst2"]);
    }

    #[test]
    fn standalone_matching_requires_node_ref_to_match() {
        let mut topology = sample_topology();
        // Same instance name, different node: not the same member.
        topology.clusters[0].members.push(MemberRef {
            name: "inst2".to_string(),
            node_ref: "some-other-node".to_string(),
        });
        let standalone = standalone_instances(&topology);
        assert!(standalone.iter().any(|i| i.name == "inst2"));
    }
}

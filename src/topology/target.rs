use std::fmt;

use serde::Serialize;

use crate::topology::Topology;

/// The topology entity a collection run is scoped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TargetKind {
    Domain,
    Instance,
    Cluster,
    DeploymentGroup,
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetKind::Domain => write!(f, "domain"),
            TargetKind::Instance => write!(f, "instance"),
            TargetKind::Cluster => write!(f, "cluster"),
            TargetKind::DeploymentGroup => write!(f, "deployment group"),
        }
    }
}

/// Resolve a target name to a topology entity.
///
/// The check order is fixed: the literal `domain`, then instance names,
/// then deployment groups, then clusters. Instance and group/cluster
/// identifiers live in disjoint namespaces in practice, but the order
/// keeps resolution deterministic when names collide.
pub fn resolve_target(target: &str, topology: &Topology) -> Option<TargetKind> {
    if target == "domain" {
        return Some(TargetKind::Domain);
    }
    if topology.find_instance(target).is_some() {
        return Some(TargetKind::Instance);
    }
    if topology.deployment_group(target).is_some() {
        return Some(TargetKind::DeploymentGroup);
    }
    if topology.cluster(target).is_some() {
        return Some(TargetKind::Cluster);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::sample_topology;
    use crate::topology::Cluster;

    #[test]
    fn resolves_each_kind() {
        let topology = sample_topology();
        assert_eq!(resolve_target("domain", &topology), Some(TargetKind::Domain));
        assert_eq!(resolve_target("inst1", &topology), Some(TargetKind::Instance));
        assert_eq!(
            resolve_target("web-cluster", &topology),
            Some(TargetKind::Cluster)
        );
        assert_eq!(
            resolve_target("dg1", &topology),
            Some(TargetKind::DeploymentGroup)
        );
    }

    #[test]
    fn unknown_target_is_not_found() {
        let topology = sample_topology();
        assert_eq!(resolve_target("no-such-entity", &topology), None);
        assert_eq!(resolve_target("", &topology), None);
        // The DAS is not hosted on a node, so it is not an instance target.
        assert_eq!(resolve_target("server", &topology), None);
    }

    #[test]
    fn collision_prefers_instance_then_group_then_cluster() {
        let mut topology = sample_topology();
        topology.clusters.push(Cluster {
            name: "inst1".to_string(),
            members: Vec::new(),
        });
        assert_eq!(resolve_target("inst1", &topology), Some(TargetKind::Instance));

        topology.clusters.push(Cluster {
            name: "dg1".to_string(),
            members: Vec::new(),
        });
        assert_eq!(
            resolve_target("dg1", &topology),
            Some(TargetKind::DeploymentGroup)
        );
    }
}

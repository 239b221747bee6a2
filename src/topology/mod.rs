//! Read-only topology model for an application-server domain.
//!
//! The model is a flat set of value structs (nodes, instances, clusters,
//! deployment groups) populated once by a topology-loading step and never
//! mutated afterwards. The loader accepts a YAML document produced by the
//! admin layer; parsing the server's own XML configuration is out of
//! scope here and handled by that layer.

mod paths;
mod target;

pub use paths::{
    instance_home_dirs, instances_by_node, resolve_instance_paths, resolve_node_paths,
    standalone_instances, PathKind, PRODUCT_ROOT_PLACEHOLDER,
};
pub use target::{resolve_target, TargetKind};

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context as _, Result};
use log::warn;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_yaml::Value;

/// Node type as declared in the domain configuration. Only CONFIG nodes
/// have a filesystem layout reachable from this process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum NodeKind {
    #[default]
    Config,
    Ssh,
    Dcom,
}

/// A physical or logical host definition. Remote nodes stay in the model
/// for reporting but are never used for path resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub name: String,
    #[serde(default)]
    pub kind: NodeKind,
    #[serde(default = "default_true")]
    pub local: bool,
    #[serde(default)]
    pub install_dir: Option<String>,
    #[serde(default)]
    pub node_dir: Option<PathBuf>,
}

/// One server process. The DAS (domain administration server) carries
/// `das: true` and is excluded from per-node log aggregation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instance {
    pub name: String,
    #[serde(default)]
    pub node_ref: String,
    #[serde(default)]
    pub das: bool,
}

/// Cluster or deployment-group membership entry. Matching is on the
/// `(name, node_ref)` pair, not the name alone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberRef {
    pub name: String,
    #[serde(default)]
    pub node_ref: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    pub name: String,
    #[serde(default)]
    pub members: Vec<MemberRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeploymentGroup {
    pub name: String,
    #[serde(default)]
    pub members: Vec<MemberRef>,
}

/// The full administrative unit: every node, instance, cluster and
/// deployment group in the domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Topology {
    #[serde(default = "default_domain_name")]
    pub domain_name: String,
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub instances: Vec<Instance>,
    #[serde(default)]
    pub clusters: Vec<Cluster>,
    #[serde(default)]
    pub deployment_groups: Vec<DeploymentGroup>,
}

fn default_true() -> bool {
    true
}

fn default_domain_name() -> String {
    "domain1".to_string()
}

impl Topology {
    /// Load a topology document from a YAML file.
    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .context(format!("Failed to read topology file: {}", path.display()))?;
        Self::from_yaml_str(&content)
    }

    /// Parse a topology document leniently: unknown keys are ignored and
    /// a malformed optional section is logged and replaced by an empty
    /// container, since partial topology information is still useful for
    /// best-effort collection.
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let value: Value =
            serde_yaml::from_str(content).context("Failed to parse topology YAML")?;
        let mapping = match value {
            Value::Mapping(mapping) => mapping,
            _ => bail!("Topology document is not a mapping"),
        };

        let domain_name = match mapping.get(&Value::String("domain_name".to_string())) {
            Some(Value::String(name)) => name.clone(),
            Some(_) => {
                warn!("Ignoring non-string 'domain_name' in topology document");
                default_domain_name()
            }
            None => default_domain_name(),
        };

        Ok(Topology {
            domain_name,
            nodes: lenient_section(&mapping, "nodes"),
            instances: lenient_section(&mapping, "instances"),
            clusters: lenient_section(&mapping, "clusters"),
            deployment_groups: lenient_section(&mapping, "deployment_groups"),
        })
    }

    /// Minimal fallback topology: just the DAS, no nodes. Used when no
    /// topology document is supplied so that the `domain` target still
    /// resolves and the DAS-local collectors can run.
    pub fn single_das(domain_name: &str) -> Self {
        Topology {
            domain_name: domain_name.to_string(),
            nodes: Vec::new(),
            instances: vec![Instance {
                name: "server".to_string(),
                node_ref: String::new(),
                das: true,
            }],
            clusters: Vec::new(),
            deployment_groups: Vec::new(),
        }
    }

    /// Instances hosted on a declared node, in declaration order. The DAS
    /// typically has no node reference and falls out naturally.
    pub fn hosted_instances(&self) -> impl Iterator<Item = &Instance> {
        self.instances
            .iter()
            .filter(|instance| self.nodes.iter().any(|node| node.name == instance.node_ref))
    }

    pub fn instances_on_node<'a>(&'a self, node_name: &'a str) -> impl Iterator<Item = &'a Instance> {
        self.instances
            .iter()
            .filter(move |instance| instance.node_ref == node_name)
    }

    pub fn instance_names(&self) -> Vec<String> {
        self.hosted_instances()
            .map(|instance| instance.name.clone())
            .collect()
    }

    pub fn find_instance(&self, name: &str) -> Option<&Instance> {
        self.hosted_instances().find(|instance| instance.name == name)
    }

    pub fn das_instance(&self) -> Option<&Instance> {
        self.instances.iter().find(|instance| instance.das)
    }

    pub fn cluster(&self, name: &str) -> Option<&Cluster> {
        self.clusters.iter().find(|cluster| cluster.name == name)
    }

    pub fn deployment_group(&self, name: &str) -> Option<&DeploymentGroup> {
        self.deployment_groups
            .iter()
            .find(|group| group.name == name)
    }
}

fn lenient_section<T>(mapping: &serde_yaml::Mapping, key: &str) -> Vec<T>
where
    T: DeserializeOwned,
{
    match mapping.get(&Value::String(key.to_string())) {
        None => Vec::new(),
        Some(section) => match serde_yaml::from_value(section.clone()) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!("Ignoring unreadable '{}' section in topology document: {}", key, e);
                Vec::new()
            }
        },
    }
}

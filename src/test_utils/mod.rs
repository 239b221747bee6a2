//! Test utilities for diag_collector.
//!
//! Shared topology fixtures and scratch-domain builders used across the
//! unit test modules.

#![cfg(test)]

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use tempfile::TempDir;

use crate::topology::{
    Cluster, DeploymentGroup, Instance, MemberRef, Node, NodeKind, Topology,
    PRODUCT_ROOT_PLACEHOLDER,
};

/// A small but representative domain: two local CONFIG nodes (one with an
/// explicit node directory), a remote node, an SSH node, the DAS, three
/// instances, one cluster and one deployment group.
pub fn sample_topology() -> Topology {
    Topology {
        domain_name: "domain1".to_string(),
        nodes: vec![
            Node {
                name: "node-a".to_string(),
                kind: NodeKind::Config,
                local: true,
                install_dir: Some(PRODUCT_ROOT_PLACEHOLDER.to_string()),
                node_dir: None,
            },
            Node {
                name: "node-b".to_string(),
                kind: NodeKind::Config,
                local: true,
                install_dir: Some(PRODUCT_ROOT_PLACEHOLDER.to_string()),
                node_dir: Some(PathBuf::from("/var/nodes")),
            },
            Node {
                name: "node-remote".to_string(),
                kind: NodeKind::Config,
                local: false,
                install_dir: Some(PRODUCT_ROOT_PLACEHOLDER.to_string()),
                node_dir: None,
            },
            Node {
                name: "node-ssh".to_string(),
                kind: NodeKind::Ssh,
                local: true,
                install_dir: Some(PRODUCT_ROOT_PLACEHOLDER.to_string()),
                node_dir: None,
            },
        ],
        instances: vec![
            Instance {
                name: "server".to_string(),
                node_ref: String::new(),
                das: true,
            },
            Instance {
                name: "inst1".to_string(),
                node_ref: "node-a".to_string(),
                das: false,
            },
            Instance {
                name: "inst2".to_string(),
                node_ref: "node-a".to_string(),
                das: false,
            },
            Instance {
                name: "inst3".to_string(),
                node_ref: "node-b".to_string(),
                das: false,
            },
        ],
        clusters: vec![Cluster {
            name: "web-cluster".to_string(),
            members: vec![MemberRef {
                name: "inst1".to_string(),
                node_ref: "node-a".to_string(),
            }],
        }],
        deployment_groups: vec![DeploymentGroup {
            name: "dg1".to_string(),
            members: vec![MemberRef {
                name: "inst3".to_string(),
                node_ref: "node-b".to_string(),
            }],
        }],
    }
}

/// Create an on-disk domain root with a config file and a log directory.
pub fn create_domain_layout(root: &Path, domain_name: &str) -> Result<PathBuf> {
    let domain_root = root
        .join("glassfish")
        .join("domains")
        .join(domain_name);
    fs::create_dir_all(domain_root.join("config"))?;
    fs::create_dir_all(domain_root.join("logs"))?;
    fs::write(
        domain_root.join("config").join("domain.xml"),
        "<domain/>\n",
    )?;
    fs::write(domain_root.join("logs").join("server.log"), "log line\n")?;
    Ok(domain_root)
}

/// Create an on-disk instance home under a node base directory.
pub fn create_instance_layout(base: &Path, instance: &str) -> Result<PathBuf> {
    let home = base.join(instance);
    fs::create_dir_all(home.join("config"))?;
    fs::create_dir_all(home.join("logs"))?;
    fs::write(home.join("config").join("domain.xml"), "<domain/>\n")?;
    fs::write(home.join("logs").join("server.log"), "instance log\n")?;
    Ok(home)
}

pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

//! # Service Config
//!
//! The value object handed to the external scheduler for one node.

use std::collections::BTreeMap;

use serde::Serialize;
use shared_types::{ArtifactName, EnvMap, FileMount, GenesisDepositData, ResourceLimits};

use super::catalog::PortSpec;
use super::command::StartupCommand;

/// Ceremony results a node's config depends on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenesisInputs {
    /// Finalized genesis mounted into every node.
    pub final_genesis: ArtifactName,
    /// Per-validator config artifacts, indexed by validator index.
    pub validator_configs: Vec<ArtifactName>,
    /// Required for validators.
    pub deposits: Option<GenesisDepositData>,
}

/// Complete startup configuration of one node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceConfig {
    pub name: String,
    pub image: String,
    pub command: StartupCommand,
    pub files: Vec<FileMount>,
    pub ports: Vec<PortSpec>,
    pub env: EnvMap,
    pub labels: BTreeMap<String, String>,
    pub node_selectors: BTreeMap<String, String>,
    pub resources: ResourceLimits,
}

impl ServiceConfig {
    pub fn mount_for(&self, artifact: &ArtifactName) -> Option<&FileMount> {
        self.files.iter().find(|m| &m.artifact == artifact)
    }

    pub fn env_var(&self, key: &str) -> Option<&str> {
        self.env.get(key).map(String::as_str)
    }
}

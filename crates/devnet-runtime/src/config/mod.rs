//! # Devnet Configuration
//!
//! Unified configuration for every subsystem and the runtime adapters.
//!
//! ## Requirements
//!
//! - At least one validator.
//! - The ceremony and the node commands share one node home directory.
//! - Every host input (JWT secret, trusted setup, EL genesis, scripts) must
//!   exist before any remote call is made.

mod loader;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use dn_01_node_config::AssemblerConfig;
use dn_02_genesis_ceremony::CeremonyConfig;
use dn_03_peer_mesh::PeerMeshConfig;
use serde::{Deserialize, Serialize};
use shared_types::{ChainParams, NodeDescriptor, NodeRole, ResourceLimits, ServiceKey, RPC_PORT};
use thiserror::Error;

pub use loader::{load_config, ENV_OVERRIDES};

/// Configuration errors. All are detected before any remote call.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {reason}")]
    Parse { path: PathBuf, reason: String },

    #[error("invalid value for {key}: {value:?}")]
    InvalidOverride { key: &'static str, value: String },

    #[error("{what} not found at {path}")]
    MissingFile { what: &'static str, path: PathBuf },

    #[error("a devnet needs at least one validator")]
    NoValidators,

    #[error("ceremony home {ceremony:?} differs from node home {assembler:?}")]
    HomeMismatch { ceremony: String, assembler: String },
}

/// Complete devnet configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DevnetConfig {
    /// Chain identifiers and deposit parameters.
    pub chain: ChainParams,
    /// How many nodes of each role, and their images.
    pub topology: TopologyConfig,
    /// Host inputs mounted into nodes.
    pub files: FilesConfig,
    /// Node config assembler settings.
    pub assembler: AssemblerConfig,
    /// Genesis ceremony settings.
    pub ceremony: CeremonyConfig,
    /// Peer mesh settings.
    pub peer_mesh: PeerMeshConfig,
    /// Docker execution settings.
    pub docker: DockerConfig,
    /// Node control API settings.
    pub control_api: ControlApiConfig,
    /// Scheduler-written service address snapshot.
    pub registry_path: PathBuf,
    /// Where the assembled manifest is written.
    pub manifest_path: PathBuf,
}

impl Default for DevnetConfig {
    fn default() -> Self {
        Self {
            chain: ChainParams::default(),
            topology: TopologyConfig::default(),
            files: FilesConfig::default(),
            assembler: AssemblerConfig::default(),
            ceremony: CeremonyConfig::default(),
            peer_mesh: PeerMeshConfig::default(),
            docker: DockerConfig::default(),
            control_api: ControlApiConfig::default(),
            registry_path: PathBuf::from("./.devnet/services.toml"),
            manifest_path: PathBuf::from("./.devnet/manifest.json"),
        }
    }
}

impl DevnetConfig {
    /// Fail fast on missing inputs before anything runs.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.topology.validators.count == 0 {
            return Err(ConfigError::NoValidators);
        }
        if self.ceremony.home != self.assembler.home {
            return Err(ConfigError::HomeMismatch {
                ceremony: self.ceremony.home.clone(),
                assembler: self.assembler.home.clone(),
            });
        }

        let required: [(&'static str, &Path); 5] = [
            ("JWT secret", &self.files.jwt_secret),
            ("trusted setup", &self.files.trusted_setup),
            ("execution-layer genesis", &self.ceremony.el_genesis),
            ("collect script", &self.ceremony.collect_script),
            ("finalize script", &self.ceremony.finalize_script),
        ];
        for (what, path) in required {
            if !path.exists() {
                return Err(ConfigError::MissingFile {
                    what,
                    path: path.to_path_buf(),
                });
            }
        }
        Ok(())
    }

    /// Every node in deployment order: validators, seeds, full nodes.
    pub fn nodes(&self) -> Vec<NodeDescriptor> {
        let t = &self.topology;
        let mut nodes = Vec::new();
        nodes.extend((0..t.validators.count).map(|i| t.validators.describe(NodeDescriptor::validator(i, &t.validators.image))));
        nodes.extend((0..t.seeds.count).map(|i| t.seeds.describe(NodeDescriptor::seed(i, &t.seeds.image))));
        nodes.extend((0..t.full_nodes.count).map(|i| t.full_nodes.describe(NodeDescriptor::full(i, &t.full_nodes.image))));
        nodes
    }

    /// Engine URL of the execution client paired with `key`.
    pub fn engine_dial_url(&self, key: &ServiceKey) -> String {
        self.topology
            .engine_url_template
            .replace("{role}", key.role.as_str())
            .replace("{index}", &key.ordinal.to_string())
    }

    /// Keys the dynamic dial offers to a seed: every validator and full node.
    pub fn dial_targets(&self) -> Vec<ServiceKey> {
        let t = &self.topology;
        (0..t.validators.count)
            .map(|i| ServiceKey::new(NodeRole::Validator, i))
            .chain((0..t.full_nodes.count).map(|i| ServiceKey::new(NodeRole::Full, i)))
            .collect()
    }
}

/// Nodes of one role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeGroupConfig {
    pub count: u32,
    pub image: String,
    pub resources: ResourceLimits,
    pub labels: BTreeMap<String, String>,
    pub node_selectors: BTreeMap<String, String>,
}

impl NodeGroupConfig {
    fn with_count(count: u32) -> Self {
        Self {
            count,
            ..Default::default()
        }
    }

    fn describe(&self, node: NodeDescriptor) -> NodeDescriptor {
        let node = node.with_resources(self.resources);
        let node = self
            .labels
            .iter()
            .fold(node, |n, (k, v)| n.with_label(k.clone(), v.clone()));
        self.node_selectors
            .iter()
            .fold(node, |n, (k, v)| n.with_node_selector(k.clone(), v.clone()))
    }
}

impl Default for NodeGroupConfig {
    fn default() -> Self {
        Self {
            count: 0,
            image: "ghcr.io/berachain/beacon-kit:main".to_string(),
            resources: ResourceLimits::default(),
            labels: BTreeMap::new(),
            node_selectors: BTreeMap::new(),
        }
    }
}

/// Devnet topology.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TopologyConfig {
    pub validators: NodeGroupConfig,
    pub seeds: NodeGroupConfig,
    pub full_nodes: NodeGroupConfig,
    /// Node id of seed `i`, in seed order. Resolved into persistent peers.
    pub bootstrap_node_ids: Vec<String>,
    /// `{role}` and `{index}` are substituted per node.
    pub engine_url_template: String,
}

impl Default for TopologyConfig {
    fn default() -> Self {
        Self {
            validators: NodeGroupConfig::with_count(4),
            seeds: NodeGroupConfig::with_count(1),
            full_nodes: NodeGroupConfig::with_count(0),
            bootstrap_node_ids: Vec::new(),
            engine_url_template: "http://el-{role}-reth-{index}:8551".to_string(),
        }
    }
}

/// Host files every node mounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilesConfig {
    pub jwt_secret: PathBuf,
    pub trusted_setup: PathBuf,
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            jwt_secret: PathBuf::from("./jwt/jwt-secret.hex"),
            trusted_setup: PathBuf::from("./kzg/kzg-trusted-setup.json"),
        }
    }
}

/// Docker execution boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DockerConfig {
    /// Docker CLI binary.
    pub binary: String,
    /// Local directory holding one entry per stored artifact.
    pub artifact_root: PathBuf,
    /// Network step containers join, if any.
    pub network: Option<String>,
}

impl Default for DockerConfig {
    fn default() -> Self {
        Self {
            binary: "docker".to_string(),
            artifact_root: PathBuf::from("./.devnet/artifacts"),
            network: None,
        }
    }
}

/// Node control API client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlApiConfig {
    pub port: u16,
    pub timeout_secs: u64,
    pub connect_timeout_secs: u64,
}

impl ControlApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

impl Default for ControlApiConfig {
    fn default() -> Self {
        Self {
            port: RPC_PORT,
            timeout_secs: 5,
            connect_timeout_secs: 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_files(dir: &Path) -> DevnetConfig {
        let mut config = DevnetConfig::default();
        for name in ["jwt", "kzg", "eth-genesis.json", "collect.sh", "finalize.sh"] {
            std::fs::write(dir.join(name), "x").unwrap();
        }
        config.files.jwt_secret = dir.join("jwt");
        config.files.trusted_setup = dir.join("kzg");
        config.ceremony.el_genesis = dir.join("eth-genesis.json");
        config.ceremony.collect_script = dir.join("collect.sh");
        config.ceremony.finalize_script = dir.join("finalize.sh");
        config
    }

    #[test]
    fn test_validate_ok() {
        let dir = tempfile::tempdir().unwrap();
        assert!(config_with_files(dir.path()).validate().is_ok());
    }

    #[test]
    fn test_validate_missing_jwt() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config_with_files(dir.path());
        config.files.jwt_secret = dir.path().join("absent");

        match config.validate() {
            Err(ConfigError::MissingFile { what, .. }) => assert_eq!(what, "JWT secret"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_validate_no_validators() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config_with_files(dir.path());
        config.topology.validators.count = 0;
        assert!(matches!(config.validate(), Err(ConfigError::NoValidators)));
    }

    #[test]
    fn test_validate_home_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config_with_files(dir.path());
        config.ceremony.home = "/data/beacond".to_string();

        match config.validate() {
            Err(ConfigError::HomeMismatch { ceremony, assembler }) => {
                assert_eq!(ceremony, "/data/beacond");
                assert_eq!(assembler, "/root/.beacond");
            }
            other => panic!("unexpected result: {other:?}"),
        }

        config.assembler.home = "/data/beacond".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_nodes_in_deployment_order() {
        let mut config = DevnetConfig::default();
        config.topology.validators.count = 2;
        config.topology.seeds.count = 1;
        config.topology.full_nodes.count = 1;
        config.topology.full_nodes.labels.insert("tier".into(), "rpc".into());

        let names: Vec<String> = config
            .nodes()
            .iter()
            .map(|n| n.service_key().service_name())
            .collect();
        assert_eq!(
            names,
            vec![
                "cl-validator-beaconkit-0",
                "cl-validator-beaconkit-1",
                "cl-seed-beaconkit-0",
                "cl-full-beaconkit-0"
            ]
        );
        assert_eq!(config.nodes()[3].labels()["tier"], "rpc");
    }

    #[test]
    fn test_engine_dial_url() {
        let config = DevnetConfig::default();
        assert_eq!(
            config.engine_dial_url(&ServiceKey::validator(3)),
            "http://el-validator-reth-3:8551"
        );
    }
}

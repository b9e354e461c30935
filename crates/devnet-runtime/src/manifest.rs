//! # Devnet Manifest
//!
//! Output of the `genesis` command: every node's startup config plus the
//! ceremony results, written as JSON for the external scheduler.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use dn_01_node_config::ServiceConfig;
use dn_02_genesis_ceremony::StepRecord;
use serde::Serialize;
use shared_types::{ArtifactName, ChainParams, GenesisDepositData};

#[derive(Debug, Clone, Serialize)]
pub struct DevnetManifest {
    pub generated_at: DateTime<Utc>,
    pub chain: ChainParams,
    pub deposits: GenesisDepositData,
    pub final_genesis: ArtifactName,
    pub persistent_peers: String,
    pub ceremony_steps: Vec<StepRecord>,
    pub services: Vec<ServiceConfig>,
}

impl DevnetManifest {
    pub fn service(&self, name: &str) -> Option<&ServiceConfig> {
        self.services.iter().find(|s| s.name == name)
    }

    pub fn write_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(self).context("Failed to encode manifest")?;
        std::fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))
    }
}

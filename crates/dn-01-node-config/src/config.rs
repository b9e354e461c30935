//! # Assembler Configuration
//!
//! Paths and switches shared by every node config the assembler produces.

use serde::{Deserialize, Serialize};

/// Node config assembler configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssemblerConfig {
    /// Node binary inside the consensus image.
    pub binary: String,

    /// Node home directory inside the container.
    pub home: String,

    /// Publish the catalog ports. All-or-nothing.
    pub expose_ports: bool,

    /// Mount path of the ceremony's final genesis. Copied over
    /// `genesis_path()` at startup; must differ from it.
    pub staged_genesis_path: String,

    /// Mount path of the engine JWT secret.
    pub jwt_path: String,

    /// Artifact holding the JWT secret.
    pub jwt_artifact: String,

    /// Mount path of the KZG trusted setup.
    pub trusted_setup_path: String,

    /// Artifact holding the KZG trusted setup.
    pub trusted_setup_artifact: String,

    pub kzg_implementation: String,

    pub node_api_address: String,
}

impl Default for AssemblerConfig {
    fn default() -> Self {
        Self {
            binary: "/usr/bin/beacond".to_string(),
            home: "/root/.beacond".to_string(),
            expose_ports: true,
            staged_genesis_path: "/root/.tmp_genesis/genesis.json".to_string(),
            jwt_path: "/root/jwt/jwt-secret.hex".to_string(),
            jwt_artifact: "jwt_file".to_string(),
            trusted_setup_path: "/root/kzg/kzg-trusted-setup.json".to_string(),
            trusted_setup_artifact: "kzg_trusted_setup".to_string(),
            kzg_implementation: "crate-crypto/go-kzg-4844".to_string(),
            node_api_address: "0.0.0.0:3500".to_string(),
        }
    }
}

impl AssemblerConfig {
    /// Genesis the node reads, and the file the init guard tests.
    pub fn genesis_path(&self) -> String {
        format!("{}/config/genesis.json", self.home)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AssemblerConfig::default();
        assert!(config.expose_ports);
        assert_eq!(config.genesis_path(), "/root/.beacond/config/genesis.json");
        assert_ne!(config.staged_genesis_path, config.genesis_path());
    }
}

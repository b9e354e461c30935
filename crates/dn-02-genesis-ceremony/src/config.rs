//! # Ceremony Configuration
//!
//! Host-side inputs (scripts, execution-layer genesis) and the container
//! paths the ceremony scripts read from and write to.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Genesis ceremony configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CeremonyConfig {
    /// Host path of the script that initializes every validator and
    /// collects premined deposits.
    pub collect_script: PathBuf,

    /// Host path of the script that merges deposits into the final genesis.
    pub finalize_script: PathBuf,

    /// Host path of the execution-layer genesis template.
    pub el_genesis: PathBuf,

    /// Directory scripts are mounted under inside the step container.
    pub script_dir: String,

    /// Node home inside step containers.
    pub home: String,

    /// Engine URL handed to the scripts' environment.
    pub engine_dial_url: String,

    /// Working genesis location for the finalize step.
    pub working_genesis_path: String,

    /// Execution-layer genesis location for the finalize step.
    pub el_genesis_path: String,

    /// Where the finalize step writes the deposit count.
    pub deposit_count_path: String,

    /// Where the finalize step writes the deposit root.
    pub deposit_root_path: String,

    /// Require the deposit root to decode to 32 bytes.
    pub strict_root_length: bool,
}

impl Default for CeremonyConfig {
    fn default() -> Self {
        Self {
            collect_script: PathBuf::from("./scripts/multiple-premined-deposits.sh"),
            finalize_script: PathBuf::from("./scripts/finalize-genesis.sh"),
            el_genesis: PathBuf::from("./genesis/eth-genesis.json"),
            script_dir: "/app/scripts".to_string(),
            home: "/root/.beacond".to_string(),
            engine_dial_url: "http://localhost:8551".to_string(),
            working_genesis_path: "/root/.tmp_genesis/genesis.json".to_string(),
            el_genesis_path: "/root/eth_genesis/genesis.json".to_string(),
            deposit_count_path: "/root/.tmp_genesis/deposit_count".to_string(),
            deposit_root_path: "/root/.tmp_genesis/deposit_root".to_string(),
            strict_root_length: true,
        }
    }
}

impl CeremonyConfig {
    /// Container path of a script given its host path.
    pub fn script_mount(&self, script: &std::path::Path) -> String {
        let file = script
            .file_name()
            .map(|f| f.to_string_lossy().into_owned())
            .unwrap_or_else(|| "script.sh".to_string());
        format!("{}/{}", self.script_dir, file)
    }

    /// Lenient root length, for fixtures that print short roots.
    pub fn for_testing() -> Self {
        Self {
            strict_root_length: false,
            ..Default::default()
        }
    }
}

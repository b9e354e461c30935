//! # Ceremony Plan
//!
//! Pure construction of every remote step the ceremony issues, in order:
//!
//! ```text
//! collect ──> finalize ──> read deposit count ──> read deposit root
//!   │            │
//!   │            └─ captures: deposit count, deposit root, merged genesis
//!   └─ captures: N validator configs + shared genesis
//! ```

use dn_01_node_config::{env_keys, genesis_env};
use shared_types::{ArtifactName, ChainParams, EnvMap, FileMount, ServiceKey, StoreSpec};

use super::errors::CeremonyError;
use super::steps::ExecutionRequest;
use crate::config::CeremonyConfig;

pub const COLLECT_STEP: &str = "Collecting beacond genesis files";
pub const FINALIZE_STEP: &str = "Finalizing beacond genesis with premined deposits";
pub const READ_DEPOSIT_COUNT_STEP: &str = "Reading genesis deposit count";
pub const READ_DEPOSIT_ROOT_STEP: &str = "Reading genesis deposit root";

pub const COLLECT_SCRIPT_ARTIFACT: &str = "multiple-premined-deposits";
pub const FINALIZE_SCRIPT_ARTIFACT: &str = "finalize-genesis";
pub const EL_GENESIS_ARTIFACT: &str = "genesis_file";
pub const SHARED_GENESIS_ARTIFACT: &str = "cosmos-genesis-final";
pub const MERGED_GENESIS_ARTIFACT: &str = "cosmos-genesis-final-merged";
pub const DEPOSIT_COUNT_ARTIFACT: &str = "genesis-deposit-count";
pub const DEPOSIT_ROOT_ARTIFACT: &str = "genesis-deposit-root";

/// Where the collect script leaves the shared working genesis.
const SHARED_GENESIS_SOURCE: &str = "/tmp/config_genesis/.beacond/config/genesis.json";

/// Mount point for single-value reads.
const READ_MOUNT_DIR: &str = "/root/deposits";

/// Per-validator config artifact name.
pub fn validator_config_artifact(index: u32) -> ArtifactName {
    ArtifactName::new(format!("node-beacond-config-{}", index))
}

/// Every step of one ceremony, for `num_validators` validators.
#[derive(Debug, Clone)]
pub struct CeremonyPlan {
    config: CeremonyConfig,
    chain: ChainParams,
    num_validators: u32,
    image: String,
}

impl CeremonyPlan {
    /// `image` is validator 0's image; every step runs in it.
    pub fn new(
        config: CeremonyConfig,
        chain: ChainParams,
        num_validators: u32,
        image: impl Into<String>,
    ) -> Result<Self, CeremonyError> {
        if num_validators == 0 {
            return Err(CeremonyError::NoValidators);
        }
        Ok(Self {
            config,
            chain,
            num_validators,
            image: image.into(),
        })
    }

    pub fn num_validators(&self) -> u32 {
        self.num_validators
    }

    pub fn config(&self) -> &CeremonyConfig {
        &self.config
    }

    /// Environment shared by every ceremony step.
    pub fn base_env(&self) -> EnvMap {
        let moniker = ServiceKey::validator(0).service_name();
        let mut env = genesis_env(
            &moniker,
            &self.chain,
            &self.config.home,
            &self.config.engine_dial_url,
        );
        env.insert(env_keys::NUM_VALS.into(), self.num_validators.to_string());
        env
    }

    pub fn validator_config_slots(&self) -> Vec<StoreSpec> {
        (0..self.num_validators)
            .map(|i| StoreSpec::new(format!("/tmp/config{}/.beacond", i), validator_config_artifact(i)))
            .collect()
    }

    pub fn shared_genesis_slot(&self) -> StoreSpec {
        StoreSpec::new(SHARED_GENESIS_SOURCE, ArtifactName::new(SHARED_GENESIS_ARTIFACT))
    }

    /// Phase 1 slots: N validator configs plus the shared genesis.
    pub fn collect_slots(&self) -> Vec<StoreSpec> {
        let mut slots = self.validator_config_slots();
        slots.push(self.shared_genesis_slot());
        slots
    }

    /// Phase 2 slots: deposit count, deposit root, merged genesis.
    pub fn finalize_slots(&self) -> Vec<StoreSpec> {
        vec![
            StoreSpec::new(
                self.config.deposit_count_path.clone(),
                ArtifactName::new(DEPOSIT_COUNT_ARTIFACT),
            ),
            StoreSpec::new(
                self.config.deposit_root_path.clone(),
                ArtifactName::new(DEPOSIT_ROOT_ARTIFACT),
            ),
            StoreSpec::new(
                self.config.working_genesis_path.clone(),
                ArtifactName::new(MERGED_GENESIS_ARTIFACT),
            ),
        ]
    }

    pub fn collect_request(&self) -> ExecutionRequest {
        let script = self.config.script_mount(&self.config.collect_script);
        ExecutionRequest {
            description: COLLECT_STEP.to_string(),
            image: self.image.clone(),
            command: format!("chmod +x {0} && {0}", script),
            files: vec![FileMount::new(script, ArtifactName::new(COLLECT_SCRIPT_ARTIFACT))],
            env: self.base_env(),
            store: self.collect_slots(),
        }
    }

    pub fn finalize_request(&self) -> ExecutionRequest {
        let script = self.config.script_mount(&self.config.finalize_script);
        let mut env = self.base_env();
        env.insert(env_keys::ETH_GENESIS.into(), self.config.el_genesis_path.clone());

        ExecutionRequest {
            description: FINALIZE_STEP.to_string(),
            image: self.image.clone(),
            command: format!("chmod +x {0} && {0}", script),
            files: vec![
                FileMount::new(script, ArtifactName::new(FINALIZE_SCRIPT_ARTIFACT)),
                FileMount::new(
                    self.config.working_genesis_path.clone(),
                    ArtifactName::new(SHARED_GENESIS_ARTIFACT),
                ),
                FileMount::new(
                    self.config.el_genesis_path.clone(),
                    ArtifactName::new(EL_GENESIS_ARTIFACT),
                ),
            ],
            env,
            store: self.finalize_slots(),
        }
    }

    pub fn read_deposit_count_request(&self) -> ExecutionRequest {
        self.read_request(READ_DEPOSIT_COUNT_STEP, DEPOSIT_COUNT_ARTIFACT, "deposit_count")
    }

    pub fn read_deposit_root_request(&self) -> ExecutionRequest {
        self.read_request(READ_DEPOSIT_ROOT_STEP, DEPOSIT_ROOT_ARTIFACT, "deposit_root")
    }

    fn read_request(&self, description: &str, artifact: &str, file: &str) -> ExecutionRequest {
        let path = format!("{}/{}", READ_MOUNT_DIR, file);
        ExecutionRequest {
            description: description.to_string(),
            image: self.image.clone(),
            command: format!("cat {}", path),
            files: vec![FileMount::new(path, ArtifactName::new(artifact))],
            env: EnvMap::new(),
            store: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan(n: u32) -> CeremonyPlan {
        CeremonyPlan::new(CeremonyConfig::default(), ChainParams::default(), n, "beacond:test").unwrap()
    }

    #[test]
    fn test_zero_validators_rejected() {
        assert!(matches!(
            CeremonyPlan::new(CeremonyConfig::default(), ChainParams::default(), 0, "img"),
            Err(CeremonyError::NoValidators)
        ));
    }

    #[test]
    fn test_collect_reserves_n_plus_one_slots() {
        for n in [1u32, 2, 4, 16] {
            let request = plan(n).collect_request();
            assert_eq!(request.store.len(), n as usize + 1);
            assert_eq!(
                request.store.last().map(|s| s.name.as_str()),
                Some(SHARED_GENESIS_ARTIFACT)
            );
        }
    }

    #[test]
    fn test_collect_env_carries_validator_count() {
        let request = plan(3).collect_request();
        assert_eq!(request.env[env_keys::NUM_VALS], "3");
        assert_eq!(request.env[env_keys::MONIKER], "cl-validator-beaconkit-0");
        assert_eq!(request.image, "beacond:test");
    }

    #[test]
    fn test_finalize_consumes_shared_genesis() {
        let request = plan(2).finalize_request();
        assert!(request
            .files
            .iter()
            .any(|m| m.artifact.as_str() == SHARED_GENESIS_ARTIFACT));
        assert!(request
            .files
            .iter()
            .any(|m| m.artifact.as_str() == EL_GENESIS_ARTIFACT));
        assert_eq!(request.store.len(), 3);
    }

    #[test]
    fn test_reads_mount_their_artifact() {
        let count = plan(1).read_deposit_count_request();
        assert_eq!(count.command, "cat /root/deposits/deposit_count");
        assert_eq!(count.files[0].artifact.as_str(), DEPOSIT_COUNT_ARTIFACT);
        assert!(count.store.is_empty());

        let root = plan(1).read_deposit_root_request();
        assert_eq!(root.files[0].artifact.as_str(), DEPOSIT_ROOT_ARTIFACT);
    }
}

//! # Ceremony Outcome
//!
//! Everything node assembly needs from a completed ceremony.

use dn_01_node_config::GenesisInputs;
use serde::Serialize;
use shared_types::{ArtifactName, EnvMap, GenesisDepositData};

use super::steps::StepRecord;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CeremonyOutcome {
    /// Validated deposit count and root, verbatim after trimming.
    pub deposits: GenesisDepositData,
    /// Merged genesis every node mounts.
    pub final_genesis: ArtifactName,
    /// Indexed by validator index.
    pub validator_configs: Vec<ArtifactName>,
    /// Environment the ceremony steps ran with.
    pub env: EnvMap,
    /// Completed steps, in execution order.
    pub steps: Vec<StepRecord>,
}

impl CeremonyOutcome {
    pub fn genesis_inputs(&self) -> GenesisInputs {
        GenesisInputs {
            final_genesis: self.final_genesis.clone(),
            validator_configs: self.validator_configs.clone(),
            deposits: Some(self.deposits.clone()),
        }
    }

    pub fn num_validators(&self) -> usize {
        self.validator_configs.len()
    }
}

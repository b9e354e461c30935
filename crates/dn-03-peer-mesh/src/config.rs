//! # Peer Mesh Configuration

use serde::{Deserialize, Serialize};
use shared_types::P2P_PORT;

use crate::domain::DialPolicy;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PeerMeshConfig {
    /// Port peers are reached on.
    pub p2p_port: u16,

    /// Abort the dial run on the first failed batch.
    pub abort_on_first_failure: bool,
}

impl Default for PeerMeshConfig {
    fn default() -> Self {
        Self {
            p2p_port: P2P_PORT,
            abort_on_first_failure: false,
        }
    }
}

impl PeerMeshConfig {
    pub fn dial_policy(&self) -> DialPolicy {
        if self.abort_on_first_failure {
            DialPolicy::AbortOnFirstFailure
        } else {
            DialPolicy::ContinueOnFailure
        }
    }
}

//! # Inbound Ports

use async_trait::async_trait;
use shared_types::{PersistentPeerSet, ServiceKey};

use crate::domain::{DialReport, PeerMeshError};

/// Peer mesh API - inbound port.
#[async_trait]
pub trait PeerMeshApi: Send + Sync {
    /// Resolve bootstrap id `i` against seed `i`'s runtime address.
    ///
    /// Needs the seeds scheduled, not started.
    fn resolve_persistent_peers(&self, bootstrap_ids: &[String]) -> Result<PersistentPeerSet, PeerMeshError>;

    /// Query the node id of each service through its control API.
    async fn query_node_ids(&self, services: &[ServiceKey]) -> Result<Vec<(ServiceKey, String)>, PeerMeshError>;

    /// Dial `peers` from `seed` as non-persistent peers, in batches.
    ///
    /// Resolution failures abort before any call. Batch failures are
    /// reported, not returned.
    async fn dial_unsafe_peers(
        &self,
        seed: &ServiceKey,
        peers: &[(ServiceKey, String)],
    ) -> Result<DialReport, PeerMeshError>;
}

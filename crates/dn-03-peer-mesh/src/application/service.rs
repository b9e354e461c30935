//! # Peer Mesh Service
//!
//! Static persistent-peer resolution and dynamic batched dial, both through
//! an explicit `ServiceRegistry`.

use std::net::IpAddr;
use std::sync::Arc;

use async_trait::async_trait;
use shared_types::{PeerDescriptor, PersistentPeerSet, ServiceKey, ServiceRegistry};
use tracing::{debug, info, warn};

use crate::config::PeerMeshConfig;
use crate::domain::{
    chunk_peers, BatchOutcome, DialPolicy, DialReport, DialRequest, PeerMeshError, DIAL_BATCH_SIZE,
};
use crate::ports::{PeerControlApi, PeerMeshApi};

pub struct PeerMeshService<P: PeerControlApi> {
    config: PeerMeshConfig,
    registry: Arc<dyn ServiceRegistry>,
    control: Arc<P>,
}

impl<P: PeerControlApi> PeerMeshService<P> {
    pub fn new(config: PeerMeshConfig, registry: Arc<dyn ServiceRegistry>, control: Arc<P>) -> Self {
        Self {
            config,
            registry,
            control,
        }
    }

    fn resolve(&self, key: &ServiceKey) -> Result<IpAddr, PeerMeshError> {
        self.registry
            .runtime_ip(key)
            .map_err(|e| PeerMeshError::unresolved(key.service_name(), &e))
    }

    async fn issue_batches(&self, target: IpAddr, connections: Vec<String>, policy: DialPolicy) -> DialReport {
        let batches = chunk_peers(&connections, DIAL_BATCH_SIZE);
        let total = batches.len();
        let mut report = DialReport::default();

        for (index, batch) in batches.into_iter().enumerate() {
            let request = DialRequest::unsafe_batch(batch);
            let result = self.control.dial_peers(target, &request).await;

            match &result {
                Ok(()) => debug!(batch = index, peers = request.peers.len(), "dial batch accepted"),
                Err(e) => warn!(batch = index, error = %e, "dial batch failed"),
            }
            let failed = result.is_err();
            report.batches.push(BatchOutcome {
                index,
                peers: request.peers.len(),
                result,
            });

            if failed && policy == DialPolicy::AbortOnFirstFailure {
                report.skipped = total - index - 1;
                break;
            }
        }
        report
    }
}

#[async_trait]
impl<P: PeerControlApi> PeerMeshApi for PeerMeshService<P> {
    fn resolve_persistent_peers(&self, bootstrap_ids: &[String]) -> Result<PersistentPeerSet, PeerMeshError> {
        let mut peers = PersistentPeerSet::new();
        for (ordinal, node_id) in bootstrap_ids.iter().enumerate() {
            let key = ServiceKey::seed(ordinal as u32);
            let ip = self.resolve(&key)?;
            peers.push(PeerDescriptor::new(node_id.clone(), ip, self.config.p2p_port));
        }
        debug!(peers = peers.len(), "persistent peers resolved");
        Ok(peers)
    }

    async fn query_node_ids(&self, services: &[ServiceKey]) -> Result<Vec<(ServiceKey, String)>, PeerMeshError> {
        let mut ids = Vec::with_capacity(services.len());
        for key in services {
            let ip = self.resolve(key)?;
            let node_id = self.control.node_id(ip).await?;
            ids.push((*key, node_id));
        }
        Ok(ids)
    }

    async fn dial_unsafe_peers(
        &self,
        seed: &ServiceKey,
        peers: &[(ServiceKey, String)],
    ) -> Result<DialReport, PeerMeshError> {
        let target = self.resolve(seed)?;
        let connections = peers
            .iter()
            .map(|(key, node_id)| {
                self.resolve(key)
                    .map(|ip| PeerDescriptor::new(node_id.clone(), ip, self.config.p2p_port).connection_string())
            })
            .collect::<Result<Vec<_>, _>>()?;

        let report = self
            .issue_batches(target, connections, self.config.dial_policy())
            .await;

        info!(
            seed = %seed,
            batches = report.batches.len(),
            failed = report.failed(),
            skipped = report.skipped,
            "unsafe peer dial finished"
        );
        Ok(report)
    }
}

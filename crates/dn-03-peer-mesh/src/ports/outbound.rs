//! # Outbound Ports
//!
//! The control API of a running consensus node.

use std::collections::{HashMap, HashSet};
use std::net::IpAddr;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::domain::{DialRequest, PeerMeshError};

/// Peer control API - outbound port.
#[async_trait]
pub trait PeerControlApi: Send + Sync {
    /// Ask the node at `target` to dial one batch of peers.
    async fn dial_peers(&self, target: IpAddr, request: &DialRequest) -> Result<(), PeerMeshError>;

    /// Node id the node at `target` reports about itself.
    async fn node_id(&self, target: IpAddr) -> Result<String, PeerMeshError>;
}

// =============================================================================
// Mock Implementations for Testing
// =============================================================================

/// Mock control API. Records every dial; node ids are scripted per address.
#[derive(Default)]
pub struct MockPeerControl {
    node_ids: HashMap<IpAddr, String>,
    failing_calls: HashSet<usize>,
    calls: Mutex<Vec<(IpAddr, DialRequest)>>,
}

impl MockPeerControl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_node_id(mut self, target: IpAddr, node_id: impl Into<String>) -> Self {
        self.node_ids.insert(target, node_id.into());
        self
    }

    /// The `call`-th dial (zero-based) fails.
    pub fn failing_call(mut self, call: usize) -> Self {
        self.failing_calls.insert(call);
        self
    }

    pub fn calls(&self) -> Vec<(IpAddr, DialRequest)> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl PeerControlApi for MockPeerControl {
    async fn dial_peers(&self, target: IpAddr, request: &DialRequest) -> Result<(), PeerMeshError> {
        let mut calls = self.calls.lock();
        let call = calls.len();
        calls.push((target, request.clone()));

        if self.failing_calls.contains(&call) {
            return Err(PeerMeshError::ControlApi {
                target: target.to_string(),
                reason: "mock dial failure".to_string(),
            });
        }
        Ok(())
    }

    async fn node_id(&self, target: IpAddr) -> Result<String, PeerMeshError> {
        self.node_ids
            .get(&target)
            .cloned()
            .ok_or_else(|| PeerMeshError::ControlApi {
                target: target.to_string(),
                reason: "mock node unreachable".to_string(),
            })
    }
}

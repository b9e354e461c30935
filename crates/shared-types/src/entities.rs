//! # Core Domain Entities
//!
//! Node descriptors, service keys, chain parameters and peer descriptors
//! shared by every devnet subsystem.
//!
//! ## Clusters
//!
//! - **Deployment plan**: `NodeRole`, `NodeDescriptor`, `ResourceLimits`, `ChainParams`
//! - **Service identity**: `ServiceKey`
//! - **Networking**: `PeerDescriptor`, `PersistentPeerSet`

use std::collections::BTreeMap;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

use serde::{Deserialize, Serialize};

/// CometBFT peer-to-peer port on every consensus node.
pub const P2P_PORT: u16 = 26656;

/// CometBFT RPC port exposing the control API (`/status`, `/dial_peers`).
pub const RPC_PORT: u16 = 26657;

/// Environment variables handed to a remote step or a node.
///
/// Ordered so that rendered configs are deterministic.
pub type EnvMap = BTreeMap<String, String>;

// =============================================================================
// CLUSTER A: DEPLOYMENT PLAN
// =============================================================================

/// Role a consensus node plays in the devnet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeRole {
    /// Block-producing node that takes part in the genesis ceremony.
    Validator,
    /// Bootstrap node running in seed mode.
    Seed,
    /// Non-validating full node.
    Full,
}

impl NodeRole {
    /// Lowercase label used in service names and labels.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Validator => "validator",
            Self::Seed => "seed",
            Self::Full => "full",
        }
    }
}

impl fmt::Display for NodeRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// CPU (millicores) and memory (MiB) bounds for a node's container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceLimits {
    /// Guaranteed CPU in millicores.
    pub min_cpu: u32,
    /// CPU ceiling in millicores.
    pub max_cpu: u32,
    /// Guaranteed memory in MiB.
    pub min_memory: u32,
    /// Memory ceiling in MiB.
    pub max_memory: u32,
}

impl Default for ResourceLimits {
    fn default() -> Self {
        Self {
            min_cpu: 0,
            max_cpu: 2000,
            min_memory: 0,
            max_memory: 2048,
        }
    }
}

/// Immutable description of one node in the deployment plan.
///
/// Built once per run through the role constructors; the `with_*` methods
/// consume the descriptor so nothing can change it after it has been handed
/// to the assembler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeDescriptor {
    role: NodeRole,
    ordinal: u32,
    image: String,
    resources: ResourceLimits,
    labels: BTreeMap<String, String>,
    node_selectors: BTreeMap<String, String>,
}

impl NodeDescriptor {
    fn new(role: NodeRole, ordinal: u32, image: impl Into<String>) -> Self {
        Self {
            role,
            ordinal,
            image: image.into(),
            resources: ResourceLimits::default(),
            labels: BTreeMap::new(),
            node_selectors: BTreeMap::new(),
        }
    }

    /// Validator `index` (its ordinal doubles as the validator index).
    pub fn validator(index: u32, image: impl Into<String>) -> Self {
        Self::new(NodeRole::Validator, index, image)
    }

    /// Seed node at `ordinal`.
    pub fn seed(ordinal: u32, image: impl Into<String>) -> Self {
        Self::new(NodeRole::Seed, ordinal, image)
    }

    /// Full node at `ordinal`.
    pub fn full(ordinal: u32, image: impl Into<String>) -> Self {
        Self::new(NodeRole::Full, ordinal, image)
    }

    pub fn with_resources(mut self, resources: ResourceLimits) -> Self {
        self.resources = resources;
        self
    }

    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }

    pub fn with_node_selector(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.node_selectors.insert(key.into(), value.into());
        self
    }

    pub fn role(&self) -> NodeRole {
        self.role
    }

    pub fn ordinal(&self) -> u32 {
        self.ordinal
    }

    /// Validator index, present only for validators.
    pub fn validator_index(&self) -> Option<u32> {
        match self.role {
            NodeRole::Validator => Some(self.ordinal),
            _ => None,
        }
    }

    pub fn image(&self) -> &str {
        &self.image
    }

    pub fn resources(&self) -> ResourceLimits {
        self.resources
    }

    pub fn labels(&self) -> &BTreeMap<String, String> {
        &self.labels
    }

    pub fn node_selectors(&self) -> &BTreeMap<String, String> {
        &self.node_selectors
    }

    /// Registry key of the service running this node.
    pub fn service_key(&self) -> ServiceKey {
        ServiceKey::new(self.role, self.ordinal)
    }
}

/// Chain-wide parameters injected into every ceremony step and node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainParams {
    /// Consensus-layer chain id (e.g. `beacond-2061`).
    pub chain_id: String,
    /// Execution-layer chain id.
    pub eth_chain_id: u64,
    /// Network label passed as `BEACOND_NET`.
    pub network: String,
    /// Chain-spec payload (`devnet`, `testnet`, or a file reference).
    pub chain_spec: String,
    /// Keyring backend used by the init scripts.
    pub keyring_backend: String,
    /// Minimum gas price accepted by the node.
    pub minimum_gas_price: String,
    /// Withdrawal credentials address for premined deposits.
    pub withdrawal_address: String,
    /// Premined deposit amount per validator (gwei).
    pub deposit_amount: String,
}

impl Default for ChainParams {
    fn default() -> Self {
        Self {
            chain_id: "beacond-2061".to_string(),
            eth_chain_id: 80087,
            network: "VALUE_2".to_string(),
            chain_spec: "devnet".to_string(),
            keyring_backend: "test".to_string(),
            minimum_gas_price: "0abgt".to_string(),
            withdrawal_address: "0x20f33ce90a13a4b5e7697e3544c3083b8f8a51d4".to_string(),
            deposit_amount: "32000000000".to_string(),
        }
    }
}

// =============================================================================
// CLUSTER B: SERVICE IDENTITY
// =============================================================================

/// Explicit `(role, ordinal)` key for a scheduled service.
///
/// The conventional service names are derived here and nowhere else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ServiceKey {
    pub role: NodeRole,
    pub ordinal: u32,
}

impl ServiceKey {
    pub fn new(role: NodeRole, ordinal: u32) -> Self {
        Self { role, ordinal }
    }

    pub fn validator(ordinal: u32) -> Self {
        Self::new(NodeRole::Validator, ordinal)
    }

    pub fn seed(ordinal: u32) -> Self {
        Self::new(NodeRole::Seed, ordinal)
    }

    pub fn full(ordinal: u32) -> Self {
        Self::new(NodeRole::Full, ordinal)
    }

    /// Scheduler-facing service name, e.g. `cl-seed-beaconkit-0`.
    pub fn service_name(&self) -> String {
        format!("cl-{}-beaconkit-{}", self.role.as_str(), self.ordinal)
    }

    /// Parse a conventional service name back into a key.
    pub fn from_service_name(name: &str) -> Option<Self> {
        let rest = name.strip_prefix("cl-")?;
        let (role, ordinal) = rest.split_once("-beaconkit-")?;
        let role = match role {
            "validator" => NodeRole::Validator,
            "seed" => NodeRole::Seed,
            "full" => NodeRole::Full,
            _ => return None,
        };
        Some(Self::new(role, ordinal.parse().ok()?))
    }
}

impl fmt::Display for ServiceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.service_name())
    }
}

// =============================================================================
// CLUSTER C: NETWORKING
// =============================================================================

/// A dialable peer: CometBFT node id plus its p2p `host:port`.
///
/// Only valid for the lifetime of the node it identifies.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PeerDescriptor {
    pub node_id: String,
    pub p2p_address: String,
}

impl PeerDescriptor {
    pub fn new(node_id: impl Into<String>, ip: IpAddr, port: u16) -> Self {
        Self {
            node_id: node_id.into(),
            p2p_address: SocketAddr::new(ip, port).to_string(),
        }
    }

    /// `node_id@host:port`, with IPv6 hosts bracketed.
    pub fn connection_string(&self) -> String {
        format!("{}@{}", self.node_id, self.p2p_address)
    }
}

impl fmt::Display for PeerDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.node_id, self.p2p_address)
    }
}

/// Ordered persistent-peer list; order only affects initial dial priority.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistentPeerSet(Vec<PeerDescriptor>);

impl PersistentPeerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, peer: PeerDescriptor) {
        self.0.push(peer);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PeerDescriptor> {
        self.0.iter()
    }

    /// Comma-joined connection string for `--p2p.persistent_peers`.
    pub fn to_connection_string(&self) -> String {
        self.0
            .iter()
            .map(PeerDescriptor::connection_string)
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl FromIterator<PeerDescriptor> for PersistentPeerSet {
    fn from_iter<I: IntoIterator<Item = PeerDescriptor>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for PersistentPeerSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_connection_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validator_index_only_for_validators() {
        assert_eq!(NodeDescriptor::validator(3, "img").validator_index(), Some(3));
        assert_eq!(NodeDescriptor::seed(3, "img").validator_index(), None);
        assert_eq!(NodeDescriptor::full(0, "img").validator_index(), None);
    }

    #[test]
    fn test_service_name_round_trip() {
        let key = ServiceKey::seed(4);
        assert_eq!(key.service_name(), "cl-seed-beaconkit-4");
        assert_eq!(ServiceKey::from_service_name("cl-seed-beaconkit-4"), Some(key));
        assert_eq!(ServiceKey::from_service_name("el-seed-reth-4"), None);
        assert_eq!(ServiceKey::from_service_name("cl-archive-beaconkit-1"), None);
    }

    #[test]
    fn test_descriptor_builders() {
        let desc = NodeDescriptor::full(1, "beacond:latest")
            .with_label("team", "infra")
            .with_node_selector("zone", "a");
        assert_eq!(desc.labels().get("team").map(String::as_str), Some("infra"));
        assert_eq!(desc.node_selectors().len(), 1);
        assert_eq!(desc.service_key(), ServiceKey::full(1));
    }

    #[test]
    fn test_persistent_peer_string() {
        let peers: PersistentPeerSet = vec![
            PeerDescriptor::new("abc", IpAddr::from([10, 0, 0, 1]), P2P_PORT),
            PeerDescriptor::new("def", IpAddr::from([10, 0, 0, 2]), P2P_PORT),
        ]
        .into_iter()
        .collect();

        assert_eq!(
            peers.to_connection_string(),
            "abc@10.0.0.1:26656,def@10.0.0.2:26656"
        );
    }

    #[test]
    fn test_ipv6_peer_is_bracketed() {
        let ip: IpAddr = "fd00::1".parse().unwrap();
        let peer = PeerDescriptor::new("abc", ip, P2P_PORT);
        assert_eq!(peer.p2p_address, "[fd00::1]:26656");
        assert_eq!(peer.connection_string(), "abc@[fd00::1]:26656");
    }

    #[test]
    fn test_empty_peer_set_renders_empty() {
        assert_eq!(PersistentPeerSet::new().to_string(), "");
    }
}

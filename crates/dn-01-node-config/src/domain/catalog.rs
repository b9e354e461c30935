//! # Port / Env Catalog
//!
//! Static table of the endpoints a consensus node can publish and the
//! environment variables the init scripts and the node binary read.

use serde::Serialize;
use shared_types::{ChainParams, EnvMap, P2P_PORT, RPC_PORT};

/// Transport protocol of a published port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransportProtocol {
    Tcp,
    Udp,
}

/// One named endpoint in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PortSpec {
    pub name: &'static str,
    pub number: u16,
    pub protocol: TransportProtocol,
    /// Disabled entries are documented here but never published.
    #[serde(skip)]
    pub enabled: bool,
}

impl PortSpec {
    const fn tcp(name: &'static str, number: u16) -> Self {
        Self {
            name,
            number,
            protocol: TransportProtocol::Tcp,
            enabled: true,
        }
    }

    const fn disabled(self) -> Self {
        Self {
            enabled: false,
            ..self
        }
    }
}

/// Every endpoint a consensus node knows about.
pub const PORT_CATALOG: &[PortSpec] = &[
    PortSpec::tcp("cometbft-p2p", P2P_PORT),
    PortSpec::tcp("cometbft-rpc", RPC_PORT),
    PortSpec::tcp("cometbft-grpc", 9090),
    PortSpec::tcp("cosmos-api", 1317),
    PortSpec::tcp("prometheus", 26660),
    PortSpec::tcp("node-api", 3500),
    // Engine API is dialed by the node, not published.
    PortSpec::tcp("engine-rpc", 8551).disabled(),
];

/// Ports to publish for a node. Exposure is all-or-nothing.
pub fn published_ports(expose: bool) -> Vec<PortSpec> {
    if !expose {
        return Vec::new();
    }
    PORT_CATALOG.iter().copied().filter(|p| p.enabled).collect()
}

/// Environment variable names shared by the scripts and the node.
pub mod env_keys {
    pub const MONIKER: &str = "BEACOND_MONIKER";
    pub const NET: &str = "BEACOND_NET";
    pub const HOME: &str = "BEACOND_HOME";
    pub const CHAIN_ID: &str = "BEACOND_CHAIN_ID";
    pub const ETH_CHAIN_ID: &str = "BEACOND_ETH_CHAIN_ID";
    pub const KEYRING_BACKEND: &str = "BEACOND_KEYRING_BACKEND";
    pub const MINIMUM_GAS_PRICE: &str = "BEACOND_MINIMUM_GAS_PRICE";
    pub const ENGINE_DIAL_URL: &str = "BEACOND_ENGINE_DIAL_URL";
    pub const PERSISTENT_PEERS: &str = "BEACOND_PERSISTENT_PEERS";
    pub const ENABLE_PROMETHEUS: &str = "BEACOND_ENABLE_PROMETHEUS";
    pub const CHAIN_SPEC: &str = "CHAIN_SPEC";
    pub const WITHDRAWAL_ADDRESS: &str = "WITHDRAWAL_ADDRESS";
    pub const DEPOSIT_AMOUNT: &str = "DEPOSIT_AMOUNT";
    pub const DEPOSIT_COUNT: &str = "DEPOSIT_COUNT";
    pub const DEPOSIT_ROOT: &str = "DEPOSIT_ROOT";
    pub const NUM_VALS: &str = "NUM_VALS";
    pub const ETH_GENESIS: &str = "ETH_GENESIS";
}

/// Base environment for a node or ceremony step.
pub fn genesis_env(moniker: &str, chain: &ChainParams, home: &str, engine_dial_url: &str) -> EnvMap {
    let mut env = EnvMap::new();
    env.insert(env_keys::MONIKER.into(), moniker.into());
    env.insert(env_keys::NET.into(), chain.network.clone());
    env.insert(env_keys::HOME.into(), home.into());
    env.insert(env_keys::CHAIN_ID.into(), chain.chain_id.clone());
    env.insert(env_keys::ETH_CHAIN_ID.into(), chain.eth_chain_id.to_string());
    env.insert(env_keys::KEYRING_BACKEND.into(), chain.keyring_backend.clone());
    env.insert(env_keys::MINIMUM_GAS_PRICE.into(), chain.minimum_gas_price.clone());
    env.insert(env_keys::ENGINE_DIAL_URL.into(), engine_dial_url.into());
    env.insert(env_keys::ENABLE_PROMETHEUS.into(), "true".into());
    env.insert(env_keys::CHAIN_SPEC.into(), chain.chain_spec.clone());
    env.insert(env_keys::WITHDRAWAL_ADDRESS.into(), chain.withdrawal_address.clone());
    env.insert(env_keys::DEPOSIT_AMOUNT.into(), chain.deposit_amount.clone());
    env
}

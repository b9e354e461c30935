//! Shared fixtures: a small topology over mock ports.

use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;

use devnet_runtime::{DevnetConfig, DevnetOrchestrator};
use dn_02_genesis_ceremony::MockExecutor;
use dn_03_peer_mesh::MockPeerControl;
use shared_types::{InMemoryServiceRegistry, ServiceKey};

pub type MockOrchestrator = DevnetOrchestrator<MockExecutor, MockPeerControl>;

pub fn seed_ip(i: u32) -> IpAddr {
    IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1 + i as u8))
}

pub fn validator_ip(i: u32) -> IpAddr {
    IpAddr::V4(Ipv4Addr::new(10, 0, 1, 1 + i as u8))
}

pub fn full_ip(i: u32) -> IpAddr {
    IpAddr::V4(Ipv4Addr::new(10, 0, 2, 1 + i as u8))
}

pub fn config(validators: u32, seeds: u32, full_nodes: u32) -> DevnetConfig {
    let mut config = DevnetConfig::default();
    config.topology.validators.count = validators;
    config.topology.validators.image = "beacond:test".to_string();
    config.topology.seeds.count = seeds;
    config.topology.full_nodes.count = full_nodes;
    config
}

/// Every configured node scheduled, with node id `<service name>-id`.
pub fn scheduled(config: &DevnetConfig) -> (Arc<InMemoryServiceRegistry>, MockPeerControl) {
    let registry = InMemoryServiceRegistry::new();
    let mut control = MockPeerControl::new();
    let t = &config.topology;

    let groups: [(u32, fn(u32) -> ServiceKey, fn(u32) -> IpAddr); 3] = [
        (t.seeds.count, ServiceKey::seed, seed_ip),
        (t.validators.count, ServiceKey::validator, validator_ip),
        (t.full_nodes.count, ServiceKey::full, full_ip),
    ];
    for (count, key, ip) in groups {
        for i in 0..count {
            registry.insert(key(i), ip(i));
            control = control.with_node_id(ip(i), format!("{}-id", key(i)));
        }
    }
    (Arc::new(registry), control)
}

pub fn orchestrator(
    config: DevnetConfig,
    executor: MockExecutor,
) -> (MockOrchestrator, Arc<MockExecutor>, Arc<MockPeerControl>) {
    let (registry, control) = scheduled(&config);
    let executor = Arc::new(executor);
    let control = Arc::new(control);
    (
        DevnetOrchestrator::new(config, executor.clone(), control.clone(), registry),
        executor,
        control,
    )
}

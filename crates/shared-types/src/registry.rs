//! # Service Registry
//!
//! Explicit mapping from a logical `(role, ordinal)` service key to the
//! runtime address the external scheduler assigned it. Peer resolution goes
//! through this port instead of building service names by string convention
//! at every call site.

use std::collections::HashMap;
use std::net::IpAddr;

use parking_lot::RwLock;
use thiserror::Error;
use tracing::debug;

use crate::entities::ServiceKey;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// The service has not been scheduled, so it has no address yet.
    #[error("service {0} has no runtime address (not scheduled)")]
    NotScheduled(String),

    #[error("invalid runtime address for {service}: {value:?}")]
    InvalidAddress { service: String, value: String },

    #[error("failed to load service registry: {0}")]
    Load(String),
}

/// Lookup of runtime addresses for scheduled services.
pub trait ServiceRegistry: Send + Sync {
    /// Runtime IP of `key`, or `NotScheduled`.
    fn runtime_ip(&self, key: &ServiceKey) -> Result<IpAddr, RegistryError>;
}

/// Registry held in memory; used by tests and by adapters that load a
/// snapshot from the scheduler.
#[derive(Debug, Default)]
pub struct InMemoryServiceRegistry {
    addresses: RwLock<HashMap<ServiceKey, IpAddr>>,
}

impl InMemoryServiceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record (or replace) the address of a scheduled service.
    pub fn insert(&self, key: ServiceKey, ip: IpAddr) {
        debug!(service = %key, %ip, "service address registered");
        self.addresses.write().insert(key, ip);
    }

    pub fn remove(&self, key: &ServiceKey) -> Option<IpAddr> {
        self.addresses.write().remove(key)
    }

    pub fn len(&self) -> usize {
        self.addresses.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.addresses.read().is_empty()
    }
}

impl ServiceRegistry for InMemoryServiceRegistry {
    fn runtime_ip(&self, key: &ServiceKey) -> Result<IpAddr, RegistryError> {
        self.addresses
            .read()
            .get(key)
            .copied()
            .ok_or_else(|| RegistryError::NotScheduled(key.service_name()))
    }
}

//! # File Service Registry
//!
//! Service addresses from a TOML snapshot written by the external scheduler:
//!
//! ```toml
//! [services]
//! "cl-seed-beaconkit-0" = "10.0.0.1"
//! ```

use std::collections::BTreeMap;
use std::net::IpAddr;
use std::path::Path;

use serde::Deserialize;
use shared_types::{InMemoryServiceRegistry, RegistryError, ServiceKey, ServiceRegistry};
use tracing::{debug, info};

#[derive(Debug, Default, Deserialize)]
struct RegistryFile {
    #[serde(default)]
    services: BTreeMap<String, String>,
}

#[derive(Debug, Default)]
pub struct FileServiceRegistry {
    inner: InMemoryServiceRegistry,
}

impl FileServiceRegistry {
    pub fn load(path: &Path) -> Result<Self, RegistryError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| RegistryError::Load(format!("{}: {}", path.display(), e)))?;
        let registry = Self::parse(&raw)?;
        info!(path = %path.display(), services = registry.len(), "service registry loaded");
        Ok(registry)
    }

    /// Names outside the consensus service convention are ignored.
    pub fn parse(raw: &str) -> Result<Self, RegistryError> {
        let file: RegistryFile = toml::from_str(raw).map_err(|e| RegistryError::Load(e.to_string()))?;
        let inner = InMemoryServiceRegistry::new();

        for (name, value) in file.services {
            let Some(key) = ServiceKey::from_service_name(&name) else {
                debug!(service = %name, "skipping non-consensus service");
                continue;
            };
            let ip: IpAddr = value.trim().parse().map_err(|_| RegistryError::InvalidAddress {
                service: name.clone(),
                value: value.clone(),
            })?;
            inner.insert(key, ip);
        }
        Ok(Self { inner })
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl ServiceRegistry for FileServiceRegistry {
    fn runtime_ip(&self, key: &ServiceKey) -> Result<IpAddr, RegistryError> {
        self.inner.runtime_ip(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    #[test]
    fn test_parse_services() {
        let registry = FileServiceRegistry::parse(
            r#"
            [services]
            "cl-seed-beaconkit-0" = "10.0.0.1"
            "cl-validator-beaconkit-2" = "10.0.0.7"
            "el-seed-reth-0" = "10.0.0.50"
            "#,
        )
        .unwrap();

        assert_eq!(registry.len(), 2);
        assert_eq!(
            registry.runtime_ip(&ServiceKey::seed(0)).unwrap(),
            IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1))
        );
        assert_eq!(
            registry.runtime_ip(&ServiceKey::seed(1)),
            Err(RegistryError::NotScheduled("cl-seed-beaconkit-1".to_string()))
        );
    }

    #[test]
    fn test_invalid_address() {
        let err = FileServiceRegistry::parse("[services]\n\"cl-seed-beaconkit-0\" = \"nowhere\"\n")
            .unwrap_err();
        assert!(matches!(err, RegistryError::InvalidAddress { .. }));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("services.toml");
        std::fs::write(&path, "[services]\n\"cl-full-beaconkit-0\" = \"10.1.0.9\"\n").unwrap();

        let registry = FileServiceRegistry::load(&path).unwrap();
        assert!(registry.runtime_ip(&ServiceKey::full(0)).is_ok());
        assert!(FileServiceRegistry::load(&dir.path().join("absent.toml")).is_err());
    }
}

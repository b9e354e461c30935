//! # Stored Artifacts
//!
//! Named file bundles produced by exactly one remote step and mounted by any
//! number of later steps or nodes.

use std::collections::BTreeMap;
use std::fmt;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Unique name of a stored artifact.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArtifactName(String);

impl ArtifactName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ArtifactName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Capture declaration: after the step, store `source_path` as `name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSpec {
    pub source_path: String,
    pub name: ArtifactName,
}

impl StoreSpec {
    pub fn new(source_path: impl Into<String>, name: ArtifactName) -> Self {
        Self {
            source_path: source_path.into(),
            name,
        }
    }
}

/// Mount declaration: expose `artifact` at `mount_path`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMount {
    pub mount_path: String,
    pub artifact: ArtifactName,
}

impl FileMount {
    pub fn new(mount_path: impl Into<String>, artifact: ArtifactName) -> Self {
        Self {
            mount_path: mount_path.into(),
            artifact,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArtifactError {
    /// A second producer tried to claim an existing name.
    #[error("artifact {name} already declared by step {producer:?}")]
    AlreadyDeclared { name: ArtifactName, producer: String },

    /// A consumer referenced a name nothing has produced.
    #[error("artifact {0} has not been produced")]
    Unknown(ArtifactName),
}

/// Write-once record of which step produced each artifact.
#[derive(Debug, Default)]
pub struct ArtifactLedger {
    producers: Mutex<BTreeMap<ArtifactName, String>>,
}

impl ArtifactLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `name` for `producer`. Fails if the name is already taken.
    pub fn declare(&self, name: &ArtifactName, producer: &str) -> Result<(), ArtifactError> {
        let mut producers = self.producers.lock();
        if let Some(existing) = producers.get(name) {
            return Err(ArtifactError::AlreadyDeclared {
                name: name.clone(),
                producer: existing.clone(),
            });
        }
        debug!(artifact = %name, producer, "artifact declared");
        producers.insert(name.clone(), producer.to_string());
        Ok(())
    }

    /// Ensure `name` exists before a step mounts it.
    pub fn require(&self, name: &ArtifactName) -> Result<(), ArtifactError> {
        if self.producers.lock().contains_key(name) {
            Ok(())
        } else {
            Err(ArtifactError::Unknown(name.clone()))
        }
    }

    pub fn producer_of(&self, name: &ArtifactName) -> Option<String> {
        self.producers.lock().get(name).cloned()
    }

    pub fn len(&self) -> usize {
        self.producers.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.producers.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declare_is_write_once() {
        let ledger = ArtifactLedger::new();
        let name = ArtifactName::new("cosmos-genesis-final");

        ledger.declare(&name, "collect").unwrap();
        let err = ledger.declare(&name, "finalize").unwrap_err();

        assert_eq!(
            err,
            ArtifactError::AlreadyDeclared {
                name: name.clone(),
                producer: "collect".to_string(),
            }
        );
        assert_eq!(ledger.producer_of(&name).as_deref(), Some("collect"));
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_require_unknown() {
        let ledger = ArtifactLedger::new();
        let name = ArtifactName::new("jwt-file");
        assert_eq!(ledger.require(&name), Err(ArtifactError::Unknown(name.clone())));

        ledger.declare(&name, "upload").unwrap();
        assert!(ledger.require(&name).is_ok());
    }
}

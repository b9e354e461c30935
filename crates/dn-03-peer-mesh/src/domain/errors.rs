//! # Domain Errors

use shared_types::RegistryError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PeerMeshError {
    /// The service has no runtime address yet.
    #[error("cannot resolve {service}: {reason}")]
    Unresolved { service: String, reason: String },

    /// A control API call failed.
    #[error("peer control call to {target} failed: {reason}")]
    ControlApi { target: String, reason: String },

    /// The control API answered with something unusable.
    #[error("unexpected response from {target}: {reason}")]
    InvalidResponse { target: String, reason: String },
}

impl PeerMeshError {
    pub fn unresolved(service: impl Into<String>, err: &RegistryError) -> Self {
        Self::Unresolved {
            service: service.into(),
            reason: err.to_string(),
        }
    }
}

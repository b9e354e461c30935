//! # Domain Errors
//!
//! Every variant is fatal to the ceremony. Nothing here is retried and no
//! partial genesis is ever returned.

use shared_types::{ArtifactError, DepositValueError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CeremonyError {
    /// The ceremony needs at least one validator.
    #[error("genesis ceremony requires at least one validator")]
    NoValidators,

    /// A remote step could not be run or exited non-zero.
    #[error("ceremony step {step:?} failed: {reason}")]
    StepFailed { step: String, reason: String },

    /// Uploading a host file into the artifact store failed.
    #[error("failed to upload {name}: {reason}")]
    UploadFailed { name: String, reason: String },

    /// Deposit count/root read back empty or malformed.
    #[error("invalid deposit value: {0}")]
    InvalidDepositValue(#[from] DepositValueError),

    /// Artifact declared twice or consumed before production.
    #[error("artifact error: {0}")]
    Artifact(#[from] ArtifactError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_failed_names_step() {
        let err = CeremonyError::StepFailed {
            step: "Collecting beacond genesis files".to_string(),
            reason: "exit code 1".to_string(),
        };
        assert!(err.to_string().contains("Collecting beacond genesis files"));
    }

    #[test]
    fn test_deposit_error_converts() {
        let err: CeremonyError = DepositValueError::Empty { field: "deposit_root" }.into();
        assert!(err.to_string().contains("deposit_root is empty"));
    }
}

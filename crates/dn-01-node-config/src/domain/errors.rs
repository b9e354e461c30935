//! # Domain Errors
//!
//! Caller-detectable assembly failures. These are raised before any remote
//! call is made for the node.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssemblyError {
    /// A validator was assembled before the ceremony produced deposit data.
    #[error("validator {service} requires genesis deposit data")]
    MissingDepositData { service: String },

    /// The ceremony produced no config artifact for this validator index.
    #[error("no ceremony config artifact for validator index {index}")]
    MissingValidatorConfig { index: u32 },
}

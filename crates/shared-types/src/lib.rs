//! # Shared Types Crate
//!
//! Domain types shared by the devnet bootstrap subsystems.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: cross-crate types are defined here.
//! - **Validated values**: deposit values are typed (`HexValue`) and never
//!   travel as raw strings.
//! - **Explicit service identity**: `ServiceKey` plus the `ServiceRegistry`
//!   port replace ad-hoc service-name construction.

pub mod artifacts;
pub mod deposit;
pub mod entities;
pub mod registry;

pub use artifacts::{ArtifactError, ArtifactLedger, ArtifactName, FileMount, StoreSpec};
pub use deposit::{DepositValueError, GenesisDepositData, HexValue, DEPOSIT_ROOT_SIZE};
pub use entities::*;
pub use registry::{InMemoryServiceRegistry, RegistryError, ServiceRegistry};

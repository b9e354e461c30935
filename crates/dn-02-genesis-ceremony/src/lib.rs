//! # DN-02 Genesis Ceremony Coordinator
//!
//! Builds the canonical genesis every validator agrees on, before any node
//! starts.
//!
//! **Subsystem ID:** 2
//! **Architecture:** Hexagonal (domain, ports, application)
//!
//! ## Protocol
//!
//! 1. **Collect**: one remote step on validator 0's image initializes all N
//!    validators and captures N per-validator configs plus a shared genesis.
//! 2. **Finalize**: one remote step merges premined deposits into the shared
//!    genesis against the execution-layer genesis, capturing deposit count,
//!    deposit root and the merged genesis.
//! 3. **Read**: two remote reads print the deposit count and root, which are
//!    trimmed and validated as hex before anything uses them.
//!
//! Every step is awaited before the next. Any failure aborts the ceremony
//! and no partial genesis is returned.
//!
//! ## Module Structure
//!
//! ```text
//! dn-02-genesis-ceremony/
//! ├── domain/          # Steps, CeremonyPlan, CeremonyOutcome, errors
//! ├── ports/
//! │   ├── inbound.rs   # GenesisCeremonyApi
//! │   └── outbound.rs  # RemoteExecutor (+ MockExecutor)
//! ├── application/     # GenesisCeremonyService
//! └── config.rs        # CeremonyConfig
//! ```

#![warn(clippy::all)]

pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

pub use application::GenesisCeremonyService;
pub use config::CeremonyConfig;
pub use domain::{
    validator_config_artifact, CeremonyError, CeremonyOutcome, CeremonyPlan, ExecutionOutput,
    ExecutionRequest, StepRecord, MERGED_GENESIS_ARTIFACT,
};
pub use ports::{ExecutionError, GenesisCeremonyApi, MockExecutor, RemoteExecutor};

//! # DN-01 Node Config Assembler
//!
//! Computes the startup configuration of every consensus node in the devnet.
//!
//! **Subsystem ID:** 1
//! **Architecture:** Hexagonal (domain + application, no I/O)
//!
//! ## Purpose
//!
//! Given a node's role and the genesis ceremony's results, produce:
//! - a typed startup command (init-if-absent and start steps),
//! - file mounts (per-validator config, final genesis, JWT, trusted setup),
//! - published ports (all-or-nothing),
//! - environment variables, labels, node selectors and resource limits.
//!
//! ## Module Structure
//!
//! ```text
//! dn-01-node-config/
//! ├── domain/          # Port/env catalog, StartupCommand, ServiceConfig, errors
//! ├── application/     # NodeConfigAssembler
//! └── config.rs        # AssemblerConfig
//! ```

#![warn(clippy::all)]

pub mod application;
pub mod config;
pub mod domain;

pub use application::{initializes, NodeConfigAssembler};
pub use config::AssemblerConfig;
pub use domain::{
    env_keys, genesis_env, published_ports, AssemblyError, GenesisInputs, InitArgs, InstallArgs, PortSpec,
    ServiceConfig, StartArgs, StartupCommand, StartupStep, TransportProtocol, PORT_CATALOG,
};

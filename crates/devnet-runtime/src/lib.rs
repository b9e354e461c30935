//! # Devnet Runtime Library
//!
//! This library exposes the runtime's modules for testing. The main entry
//! point is the `main.rs` binary.
//!
//! ## Modular Structure
//!
//! - `config/` - `DevnetConfig`, TOML loading and env overrides
//! - `adapters/` - Docker executor, HTTP peer control, file service registry
//! - `orchestrator` - ceremony, assembly and peer mesh sequencing
//! - `manifest` - JSON output handed to the scheduler

pub mod adapters;
pub mod config;
pub mod manifest;
pub mod orchestrator;

pub use config::{load_config, ConfigError, DevnetConfig};
pub use manifest::DevnetManifest;
pub use orchestrator::DevnetOrchestrator;

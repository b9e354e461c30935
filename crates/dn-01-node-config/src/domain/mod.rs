//! # Domain Layer
//!
//! Pure data and value types for node configuration: the port/env catalog,
//! the typed startup command, and the assembled service config.

pub mod catalog;
pub mod command;
pub mod errors;
pub mod service_config;

pub use catalog::{env_keys, genesis_env, published_ports, PortSpec, TransportProtocol, PORT_CATALOG};
pub use command::{InitArgs, InstallArgs, StartArgs, StartupCommand, StartupStep};
pub use errors::AssemblyError;
pub use service_config::{GenesisInputs, ServiceConfig};

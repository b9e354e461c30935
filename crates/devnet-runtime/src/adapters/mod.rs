//! # Adapters
//!
//! Concrete implementations of the subsystem outbound ports.
//!
//! | Port | Adapter | Backend |
//! |------|---------|---------|
//! | `RemoteExecutor` | `DockerExecutor` | `docker` CLI via `tokio::process` |
//! | `PeerControlApi` | `HttpPeerControl` | CometBFT RPC via `reqwest` |
//! | `ServiceRegistry` | `FileServiceRegistry` | TOML snapshot from the scheduler |

pub mod docker;
pub mod file_registry;
pub mod http_peer_control;

pub use docker::DockerExecutor;
pub use file_registry::FileServiceRegistry;
pub use http_peer_control::HttpPeerControl;

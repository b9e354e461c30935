//! # DN-03 Peer Mesh Builder
//!
//! Wires independently running consensus nodes into one peer graph.
//!
//! **Subsystem ID:** 3
//! **Architecture:** Hexagonal (domain, ports, application)
//!
//! ## Mechanisms
//!
//! - **Static**: bootstrap id `i` is paired with seed `i`'s runtime address
//!   into `id@ip:26656`; the comma-joined list becomes the node's
//!   persistent-peer setting.
//! - **Dynamic**: `node_id@ip:26656` strings are sent to a running seed's
//!   `dial_peers` endpoint as non-persistent peers, in sequential batches of
//!   at most 20. Best effort: failed batches are reported, never retried.
//!
//! ## Module Structure
//!
//! ```text
//! dn-03-peer-mesh/
//! ├── domain/          # Batching, DialRequest, DialReport, errors
//! ├── ports/
//! │   ├── inbound.rs   # PeerMeshApi
//! │   └── outbound.rs  # PeerControlApi (+ MockPeerControl)
//! ├── application/     # PeerMeshService
//! └── config.rs        # PeerMeshConfig
//! ```

#![warn(clippy::all)]

pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

pub use application::PeerMeshService;
pub use config::PeerMeshConfig;
pub use domain::{
    batch_count, chunk_peers, BatchOutcome, DialPolicy, DialReport, DialRequest, PeerMeshError,
    DIAL_BATCH_SIZE, DIAL_PEERS_PATH,
};
pub use ports::{MockPeerControl, PeerControlApi, PeerMeshApi};

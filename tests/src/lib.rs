//! # Devnet Bootstrap Test Suite
//!
//! Cross-subsystem flows run against the mock ports.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── genesis_flow.rs     # ceremony -> assembly -> manifest
//!     └── peer_mesh_flow.rs   # static resolution and batched dial
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p dn-tests
//! ```

pub mod integration;

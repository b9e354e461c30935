//! # Domain Layer
//!
//! Batching, dial request encoding, dial reports and errors.

pub mod batch;
pub mod dial;
pub mod errors;
pub mod report;

pub use batch::{batch_count, chunk_peers, DIAL_BATCH_SIZE};
pub use dial::{DialRequest, DIAL_PEERS_PATH};
pub use errors::PeerMeshError;
pub use report::{BatchOutcome, DialPolicy, DialReport};

//! # Dial Batching
//!
//! The dial endpoint is reached through a URL of bounded length, so peers
//! are sent in batches of at most [`DIAL_BATCH_SIZE`].

/// Maximum peers per dial call.
pub const DIAL_BATCH_SIZE: usize = 20;

/// Split `peers` left to right into batches of at most `size` entries.
///
/// Every batch but the last holds exactly `size` entries; concatenating the
/// batches reproduces `peers`. A `size` of zero is treated as one.
pub fn chunk_peers<T: Clone>(peers: &[T], size: usize) -> Vec<Vec<T>> {
    peers.chunks(size.max(1)).map(<[T]>::to_vec).collect()
}

/// Number of dial calls `len` peers need.
pub fn batch_count(len: usize, size: usize) -> usize {
    len.div_ceil(size.max(1))
}

//! # Application Layer
//!
//! The assembler that combines descriptors, catalog and ceremony results.

pub mod assembler;

pub use assembler::{initializes, NodeConfigAssembler};

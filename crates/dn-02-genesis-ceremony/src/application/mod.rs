//! # Application Module
//!
//! Application service sequencing the ceremony over the outbound ports.

pub mod service;

pub use service::GenesisCeremonyService;

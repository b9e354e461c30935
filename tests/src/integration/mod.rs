//! # Integration Flows

pub mod fixtures;
pub mod genesis_flow;
pub mod peer_mesh_flow;

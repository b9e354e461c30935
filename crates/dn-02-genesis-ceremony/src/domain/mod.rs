//! # Domain Layer
//!
//! Step values, the ceremony plan, its outcome and errors.

pub mod errors;
pub mod outcome;
pub mod plan;
pub mod steps;

pub use errors::CeremonyError;
pub use outcome::CeremonyOutcome;
pub use plan::*;
pub use steps::{ExecutionOutput, ExecutionRequest, StepRecord};

//! # Inbound Ports
//!
//! What the genesis ceremony offers the runtime.

use async_trait::async_trait;

use crate::domain::{CeremonyError, CeremonyOutcome};

/// Genesis ceremony API - inbound port.
#[async_trait]
pub trait GenesisCeremonyApi: Send + Sync {
    /// Run collect, finalize and both deposit reads for `num_validators`
    /// validators, every step in `image`.
    ///
    /// Returns only after every step completed. Any failure aborts the whole
    /// ceremony.
    async fn run_ceremony(&self, num_validators: u32, image: &str) -> Result<CeremonyOutcome, CeremonyError>;
}

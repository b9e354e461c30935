//! # Dial Report
//!
//! Per-batch outcome of a dynamic dial run. Dialing is best effort: a failed
//! batch is recorded and is not retried.

use serde::Serialize;

use super::errors::PeerMeshError;

/// What to do after a failed batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DialPolicy {
    /// Issue every batch regardless of earlier failures.
    #[default]
    ContinueOnFailure,
    /// Stop issuing batches after the first failure.
    AbortOnFirstFailure,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchOutcome {
    pub index: usize,
    pub peers: usize,
    pub result: Result<(), PeerMeshError>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DialReport {
    pub batches: Vec<BatchOutcome>,
    /// Batches never issued because of `AbortOnFirstFailure`.
    pub skipped: usize,
}

impl DialReport {
    pub fn succeeded(&self) -> usize {
        self.batches.iter().filter(|b| b.result.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.batches.len() - self.succeeded()
    }

    pub fn is_complete_success(&self) -> bool {
        self.failed() == 0 && self.skipped == 0
    }

    pub fn first_error(&self) -> Option<&PeerMeshError> {
        self.batches.iter().find_map(|b| b.result.as_ref().err())
    }

    pub fn peers_dialed(&self) -> usize {
        self.batches
            .iter()
            .filter(|b| b.result.is_ok())
            .map(|b| b.peers)
            .sum()
    }
}

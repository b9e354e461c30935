//! # Remote Step Values
//!
//! What the coordinator asks the remote execution boundary to do, and what
//! it gets back.

use serde::Serialize;
use shared_types::{EnvMap, FileMount, StoreSpec};

/// One remote execution: run `command` in `image` with mounts and env, then
/// capture the declared paths as artifacts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExecutionRequest {
    /// Human-readable step name, surfaced on failure.
    pub description: String,
    pub image: String,
    /// Shell command, run with `sh -c`.
    pub command: String,
    pub files: Vec<FileMount>,
    pub env: EnvMap,
    pub store: Vec<StoreSpec>,
}

/// Captured result of a remote execution.
///
/// Streams stay separate: reads parse `stdout` only, so diagnostics on
/// `stderr` never corrupt a value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExecutionOutput {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl ExecutionOutput {
    pub fn success(stdout: impl Into<String>) -> Self {
        Self {
            exit_code: 0,
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.exit_code == 0
    }

    /// Failure detail: stderr when present, stdout otherwise.
    pub fn diagnostics(&self) -> &str {
        let stderr = self.stderr.trim_end();
        if stderr.is_empty() {
            self.stdout.trim_end()
        } else {
            stderr
        }
    }
}


/// Audit record of a completed step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepRecord {
    pub description: String,
    pub exit_code: i32,
}

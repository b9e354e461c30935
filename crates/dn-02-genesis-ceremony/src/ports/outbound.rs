//! # Outbound Ports
//!
//! The remote execution boundary and named artifact store the ceremony
//! drives. Adapters live in the runtime.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use parking_lot::Mutex;
use shared_types::ArtifactName;
use thiserror::Error;

use crate::domain::{
    ExecutionOutput, ExecutionRequest, READ_DEPOSIT_COUNT_STEP, READ_DEPOSIT_ROOT_STEP,
};

/// Transport-level failures. A step that ran and exited non-zero is not an
/// error here; it comes back as an `ExecutionOutput`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecutionError {
    #[error("failed to launch step: {0}")]
    Spawn(String),

    #[error("artifact {name} could not be stored: {reason}")]
    Store { name: String, reason: String },

    #[error("artifact {name} could not be mounted: {reason}")]
    Mount { name: String, reason: String },

    #[error("io error: {0}")]
    Io(String),
}

/// Remote execution boundary plus artifact upload.
#[async_trait]
pub trait RemoteExecutor: Send + Sync {
    /// Store a host file or directory under `name`.
    async fn upload_files(&self, host_path: &Path, name: &ArtifactName) -> Result<(), ExecutionError>;

    /// Run one step to completion and capture its declared artifacts.
    async fn run(&self, request: ExecutionRequest) -> Result<ExecutionOutput, ExecutionError>;
}

// =============================================================================
// Mock Implementations for Testing
// =============================================================================

/// Well-formed 32-byte root the mock prints by default.
pub const MOCK_DEPOSIT_ROOT: &str =
    "0x5d8c10b3ab0cb0a5d27ed1a4ed1b4f2bd04cd3a6e5ed6c3ec1ac8de5e4f0c8a1";

/// Mock executor that records every call.
#[derive(Default)]
pub struct MockExecutor {
    outputs: HashMap<String, ExecutionOutput>,
    failing_step: Option<String>,
    broken_step: Option<String>,
    requests: Mutex<Vec<ExecutionRequest>>,
    uploads: Mutex<Vec<(PathBuf, ArtifactName)>>,
}

impl MockExecutor {
    /// Reads print a count of four and `MOCK_DEPOSIT_ROOT`.
    pub fn new() -> Self {
        Self::default()
            .with_output(READ_DEPOSIT_COUNT_STEP, "0x04\n")
            .with_output(READ_DEPOSIT_ROOT_STEP, format!("{}\n", MOCK_DEPOSIT_ROOT))
    }

    /// Script the output of the step named `description`.
    pub fn with_output(mut self, description: &str, output: impl Into<String>) -> Self {
        self.outputs
            .insert(description.to_string(), ExecutionOutput::success(output));
        self
    }

    /// Script what the step named `description` writes to stderr.
    pub fn with_stderr(mut self, description: &str, stderr: impl Into<String>) -> Self {
        self.outputs
            .entry(description.to_string())
            .or_insert_with(|| ExecutionOutput::success(""))
            .stderr = stderr.into();
        self
    }

    /// The step named `description` exits with code 1.
    pub fn failing_step(mut self, description: &str) -> Self {
        self.failing_step = Some(description.to_string());
        self
    }

    /// The step named `description` cannot be launched at all.
    pub fn broken_step(mut self, description: &str) -> Self {
        self.broken_step = Some(description.to_string());
        self
    }

    pub fn requests(&self) -> Vec<ExecutionRequest> {
        self.requests.lock().clone()
    }

    pub fn uploads(&self) -> Vec<(PathBuf, ArtifactName)> {
        self.uploads.lock().clone()
    }

    pub fn descriptions(&self) -> Vec<String> {
        self.requests
            .lock()
            .iter()
            .map(|r| r.description.clone())
            .collect()
    }
}

#[async_trait]
impl RemoteExecutor for MockExecutor {
    async fn upload_files(&self, host_path: &Path, name: &ArtifactName) -> Result<(), ExecutionError> {
        self.uploads
            .lock()
            .push((host_path.to_path_buf(), name.clone()));
        Ok(())
    }

    async fn run(&self, request: ExecutionRequest) -> Result<ExecutionOutput, ExecutionError> {
        let description = request.description.clone();
        self.requests.lock().push(request);

        if self.broken_step.as_deref() == Some(description.as_str()) {
            return Err(ExecutionError::Spawn("mock launch failure".to_string()));
        }
        if self.failing_step.as_deref() == Some(description.as_str()) {
            return Ok(ExecutionOutput {
                exit_code: 1,
                stdout: String::new(),
                stderr: "mock step failure".to_string(),
            });
        }
        Ok(self
            .outputs
            .get(&description)
            .cloned()
            .unwrap_or_else(|| ExecutionOutput::success("")))
    }
}

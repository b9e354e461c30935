//! # Docker Executor
//!
//! `RemoteExecutor` over the `docker` CLI. Artifacts are entries under a
//! local artifact root. A step gets private copies of what it mounts, so a
//! stored artifact never changes after its producing step.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use dn_02_genesis_ceremony::{ExecutionError, ExecutionOutput, ExecutionRequest, RemoteExecutor};
use shared_types::ArtifactName;
use tokio::process::Command;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::DockerConfig;

pub struct DockerExecutor {
    config: DockerConfig,
}

impl DockerExecutor {
    pub fn new(config: DockerConfig) -> Self {
        Self { config }
    }

    pub fn artifact_path(&self, name: &ArtifactName) -> PathBuf {
        self.config.artifact_root.join(name.as_str())
    }

    fn scratch_dir(&self, run: &Uuid) -> PathBuf {
        self.config.artifact_root.join(".runs").join(run.to_string())
    }

    /// Arguments of `docker run` for one step.
    pub fn run_args(&self, container: &str, request: &ExecutionRequest, volumes: &[(PathBuf, String)]) -> Vec<String> {
        let mut args = vec!["run".to_string(), "--name".to_string(), container.to_string()];
        if let Some(network) = &self.config.network {
            args.push("--network".to_string());
            args.push(network.clone());
        }
        for (key, value) in &request.env {
            args.push("-e".to_string());
            args.push(format!("{}={}", key, value));
        }
        for (host, mount_path) in volumes {
            args.push("-v".to_string());
            args.push(format!("{}:{}", host.display(), mount_path));
        }
        args.push("--entrypoint".to_string());
        args.push("sh".to_string());
        args.push(request.image.clone());
        args.push("-c".to_string());
        args.push(request.command.clone());
        args
    }

    /// Copy each mounted artifact into the step's scratch dir.
    async fn stage_mounts(&self, scratch: &Path, request: &ExecutionRequest) -> Result<Vec<(PathBuf, String)>, ExecutionError> {
        let mut volumes = Vec::with_capacity(request.files.len());
        for (i, mount) in request.files.iter().enumerate() {
            let source = self.artifact_path(&mount.artifact);
            let staged = scratch.join(format!("{}-{}", i, mount.artifact));
            copy_path(source, staged.clone())
                .await
                .map_err(|e| ExecutionError::Mount {
                    name: mount.artifact.to_string(),
                    reason: e.to_string(),
                })?;
            let staged = tokio::fs::canonicalize(&staged)
                .await
                .map_err(|e| ExecutionError::Io(e.to_string()))?;
            volumes.push((staged, mount.mount_path.clone()));
        }
        Ok(volumes)
    }

    async fn capture(&self, container: &str, request: &ExecutionRequest) -> Result<(), ExecutionError> {
        for slot in &request.store {
            let target = self.artifact_path(&slot.name);
            clear_path(&target).await.map_err(|e| ExecutionError::Store {
                name: slot.name.to_string(),
                reason: e.to_string(),
            })?;
            let output = Command::new(&self.config.binary)
                .arg("cp")
                .arg(format!("{}:{}", container, slot.source_path))
                .arg(&target)
                .output()
                .await
                .map_err(|e| ExecutionError::Spawn(e.to_string()))?;
            if !output.status.success() {
                return Err(ExecutionError::Store {
                    name: slot.name.to_string(),
                    reason: String::from_utf8_lossy(&output.stderr).trim_end().to_string(),
                });
            }
            debug!(artifact = %slot.name, source = %slot.source_path, "artifact stored");
        }
        Ok(())
    }

    async fn remove_container(&self, container: &str) {
        let removed = Command::new(&self.config.binary)
            .args(["rm", "-f", container])
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await;
        if let Err(e) = removed {
            warn!(container, error = %e, "failed to remove step container");
        }
    }
}

#[async_trait]
impl RemoteExecutor for DockerExecutor {
    async fn upload_files(&self, host_path: &Path, name: &ArtifactName) -> Result<(), ExecutionError> {
        let target = self.artifact_path(name);
        let stored = async {
            clear_path(&target).await?;
            copy_path(host_path.to_path_buf(), target.clone()).await
        };
        stored.await.map_err(|e| ExecutionError::Store {
            name: name.to_string(),
            reason: e.to_string(),
        })
    }

    async fn run(&self, request: ExecutionRequest) -> Result<ExecutionOutput, ExecutionError> {
        let run = Uuid::new_v4();
        let container = format!("dn-step-{}", run);
        let scratch = self.scratch_dir(&run);
        tokio::fs::create_dir_all(&scratch)
            .await
            .map_err(|e| ExecutionError::Io(e.to_string()))?;

        let result = async {
            let volumes = self.stage_mounts(&scratch, &request).await?;
            let args = self.run_args(&container, &request, &volumes);
            debug!(container = %container, image = %request.image, "starting step container");

            let output = Command::new(&self.config.binary)
                .args(&args)
                .stdin(Stdio::null())
                .output()
                .await
                .map_err(|e| ExecutionError::Spawn(e.to_string()))?;

            let output = execution_output(output);
            if output.is_success() {
                self.capture(&container, &request).await?;
            }
            Ok::<_, ExecutionError>(output)
        }
        .await;

        self.remove_container(&container).await;
        if let Err(e) = tokio::fs::remove_dir_all(&scratch).await {
            warn!(path = %scratch.display(), error = %e, "failed to clean step scratch dir");
        }
        result
    }
}

fn execution_output(output: std::process::Output) -> ExecutionOutput {
    ExecutionOutput {
        exit_code: output.status.code().unwrap_or(-1),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    }
}

/// Remove whatever sits at `path` and make sure its parent exists.
/// `docker cp` nests into an existing directory instead of replacing it.
async fn clear_path(path: &Path) -> std::io::Result<()> {
    match tokio::fs::symlink_metadata(path).await {
        Ok(meta) if meta.is_dir() => tokio::fs::remove_dir_all(path).await?,
        Ok(_) => tokio::fs::remove_file(path).await?,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(e),
    }
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    Ok(())
}

/// Copy a file or directory tree, creating parents of `to`.
async fn copy_path(from: PathBuf, to: PathBuf) -> std::io::Result<()> {
    tokio::task::spawn_blocking(move || copy_blocking(&from, &to))
        .await
        .map_err(std::io::Error::other)?
}

fn copy_blocking(from: &Path, to: &Path) -> std::io::Result<()> {
    if let Some(parent) = to.parent() {
        std::fs::create_dir_all(parent)?;
    }
    if from.is_dir() {
        std::fs::create_dir_all(to)?;
        for entry in std::fs::read_dir(from)? {
            let entry = entry?;
            copy_blocking(&entry.path(), &to.join(entry.file_name()))?;
        }
        Ok(())
    } else {
        std::fs::copy(from, to).map(|_| ())
    }
}

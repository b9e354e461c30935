//! # Devnet Orchestrator
//!
//! The single coordinating sequence:
//!
//! ```text
//! upload node inputs ──> genesis ceremony ──> assemble every node ──> manifest
//!                                                     │
//!                          static peer resolution ────┘
//!
//! (later, once nodes are live)  query node ids ──> batched dial from a seed
//! ```

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use dn_01_node_config::{NodeConfigAssembler, ServiceConfig};
use dn_02_genesis_ceremony::{
    CeremonyError, CeremonyOutcome, GenesisCeremonyApi, GenesisCeremonyService, RemoteExecutor,
};
use dn_03_peer_mesh::{DialReport, PeerControlApi, PeerMeshApi, PeerMeshService};
use dn_telemetry::{log_event, log_node_event, metrics};
use shared_types::{ArtifactName, ServiceKey, ServiceRegistry};

use crate::config::DevnetConfig;
use crate::manifest::DevnetManifest;

pub struct DevnetOrchestrator<E: RemoteExecutor, P: PeerControlApi> {
    config: DevnetConfig,
    executor: Arc<E>,
    ceremony: GenesisCeremonyService<E>,
    assembler: NodeConfigAssembler,
    mesh: PeerMeshService<P>,
}

impl<E: RemoteExecutor, P: PeerControlApi> DevnetOrchestrator<E, P> {
    pub fn new(config: DevnetConfig, executor: Arc<E>, control: Arc<P>, registry: Arc<dyn ServiceRegistry>) -> Self {
        let ceremony =
            GenesisCeremonyService::new(config.ceremony.clone(), config.chain.clone(), executor.clone());
        let assembler = NodeConfigAssembler::new(config.assembler.clone(), config.chain.clone());
        let mesh = PeerMeshService::new(config.peer_mesh.clone(), registry, control);
        Self {
            config,
            executor,
            ceremony,
            assembler,
            mesh,
        }
    }

    pub fn config(&self) -> &DevnetConfig {
        &self.config
    }

    /// Run the ceremony and assemble every node. Nothing is assembled unless
    /// the ceremony completed.
    pub async fn run_genesis(&self) -> Result<DevnetManifest> {
        self.upload_node_inputs().await?;

        let outcome = self.run_ceremony().await?;
        let persistent_peers = self.persistent_peers()?;
        let services = self.assemble_all(&outcome, &persistent_peers)?;

        log_event!(
            info,
            "orchestrator",
            "devnet genesis assembled",
            services = services.len(),
            deposit_root = %outcome.deposits.deposit_root
        );

        Ok(DevnetManifest {
            generated_at: Utc::now(),
            chain: self.config.chain.clone(),
            deposits: outcome.deposits,
            final_genesis: outcome.final_genesis,
            persistent_peers,
            ceremony_steps: outcome.steps,
            services,
        })
    }

    /// Comma-joined persistent peers for the configured bootstrap ids.
    pub fn persistent_peers(&self) -> Result<String> {
        let peers = self
            .mesh
            .resolve_persistent_peers(&self.config.topology.bootstrap_node_ids)
            .context("Failed to resolve persistent peers")?;
        Ok(peers.to_connection_string())
    }

    /// Dial every validator and full node from seed `seed`.
    pub async fn dial_from_seed(&self, seed: u32) -> Result<DialReport> {
        let targets = self.config.dial_targets();
        let ids = self
            .mesh
            .query_node_ids(&targets)
            .await
            .context("Failed to query node ids")?;

        let report = self
            .mesh
            .dial_unsafe_peers(&ServiceKey::seed(seed), &ids)
            .await
            .context("Failed to start peer dial")?;

        for batch in &report.batches {
            metrics::record_dial_batch(metrics::outcome_label(&batch.result));
        }
        for _ in 0..report.skipped {
            metrics::record_dial_batch("skipped");
        }
        Ok(report)
    }

    async fn upload_node_inputs(&self) -> Result<()> {
        let inputs = [
            (&self.config.files.jwt_secret, &self.config.assembler.jwt_artifact),
            (&self.config.files.trusted_setup, &self.config.assembler.trusted_setup_artifact),
        ];
        for (path, name) in inputs {
            self.executor
                .upload_files(path, &ArtifactName::new(name.clone()))
                .await
                .with_context(|| format!("Failed to upload {}", path.display()))?;
        }
        Ok(())
    }

    async fn run_ceremony(&self) -> Result<CeremonyOutcome> {
        let validators = &self.config.topology.validators;
        let timer = metrics::CEREMONY_DURATION.start_timer();
        let result = self
            .ceremony
            .run_ceremony(validators.count, &validators.image)
            .await;
        timer.observe_duration();

        match &result {
            Ok(outcome) => {
                for step in &outcome.steps {
                    metrics::record_ceremony_step(&step.description, "success");
                }
            }
            Err(CeremonyError::StepFailed { step, .. }) => {
                metrics::record_ceremony_step(step, "failure");
            }
            Err(_) => {}
        }
        result.context("Genesis ceremony failed")
    }

    fn assemble_all(&self, outcome: &CeremonyOutcome, persistent_peers: &str) -> Result<Vec<ServiceConfig>> {
        let genesis = outcome.genesis_inputs();
        self.config
            .nodes()
            .iter()
            .map(|node| {
                let key = node.service_key();
                let service = self
                    .assembler
                    .assemble(node, &self.config.engine_dial_url(&key), persistent_peers, &genesis)
                    .with_context(|| format!("Failed to assemble {}", key))?;
                metrics::record_node_assembled(node.role().as_str());
                log_node_event!(info, "orchestrator", "node assembled", service.name, role = %node.role());
                Ok(service)
            })
            .collect()
    }
}

//! # Genesis Ceremony Service
//!
//! Runs the ceremony plan against a `RemoteExecutor`, one awaited step at a
//! time, and validates what the finalize step printed.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use dn_01_node_config::env_keys;
use shared_types::{ArtifactLedger, ArtifactName, ChainParams, GenesisDepositData};
use tracing::{debug, error, info, info_span, Instrument};
use uuid::Uuid;

use crate::config::CeremonyConfig;
use crate::domain::{
    validator_config_artifact, CeremonyError, CeremonyOutcome, CeremonyPlan, ExecutionOutput,
    ExecutionRequest, StepRecord, COLLECT_SCRIPT_ARTIFACT, EL_GENESIS_ARTIFACT,
    FINALIZE_SCRIPT_ARTIFACT, MERGED_GENESIS_ARTIFACT,
};
use crate::ports::{GenesisCeremonyApi, RemoteExecutor};

const UPLOAD_PRODUCER: &str = "upload";

/// Genesis ceremony coordinator.
pub struct GenesisCeremonyService<E: RemoteExecutor> {
    config: CeremonyConfig,
    chain: ChainParams,
    executor: Arc<E>,
}

impl<E: RemoteExecutor> GenesisCeremonyService<E> {
    pub fn new(config: CeremonyConfig, chain: ChainParams, executor: Arc<E>) -> Self {
        Self {
            config,
            chain,
            executor,
        }
    }

    pub fn config(&self) -> &CeremonyConfig {
        &self.config
    }

    async fn execute(&self, plan: &CeremonyPlan) -> Result<CeremonyOutcome, CeremonyError> {
        let ledger = ArtifactLedger::new();
        let mut steps = Vec::with_capacity(4);

        // Phase 1: collect
        self.upload(&ledger, &self.config.collect_script, COLLECT_SCRIPT_ARTIFACT)
            .await?;
        self.run_step(&ledger, plan.collect_request(), &mut steps).await?;

        // Phase 2: merge and finalize
        self.upload(&ledger, &self.config.finalize_script, FINALIZE_SCRIPT_ARTIFACT)
            .await?;
        self.upload(&ledger, &self.config.el_genesis, EL_GENESIS_ARTIFACT)
            .await?;
        self.run_step(&ledger, plan.finalize_request(), &mut steps).await?;

        let count = self
            .run_step(&ledger, plan.read_deposit_count_request(), &mut steps)
            .await?;
        let root = self
            .run_step(&ledger, plan.read_deposit_root_request(), &mut steps)
            .await?;

        let deposits =
            GenesisDepositData::from_raw(&count.stdout, &root.stdout, self.config.strict_root_length)?;

        let mut env = plan.base_env();
        env.insert(
            env_keys::DEPOSIT_COUNT.into(),
            deposits.deposit_count.as_str().into(),
        );
        env.insert(
            env_keys::DEPOSIT_ROOT.into(),
            deposits.deposit_root.as_str().into(),
        );

        info!(
            deposit_count = %deposits.deposit_count,
            deposit_root = %deposits.deposit_root,
            artifacts = ledger.len(),
            "genesis ceremony complete"
        );

        Ok(CeremonyOutcome {
            deposits,
            final_genesis: ArtifactName::new(MERGED_GENESIS_ARTIFACT),
            validator_configs: (0..plan.num_validators())
                .map(validator_config_artifact)
                .collect(),
            env,
            steps,
        })
    }

    async fn upload(&self, ledger: &ArtifactLedger, host_path: &Path, name: &str) -> Result<(), CeremonyError> {
        let name = ArtifactName::new(name);
        ledger.declare(&name, UPLOAD_PRODUCER)?;
        self.executor
            .upload_files(host_path, &name)
            .await
            .map_err(|e| CeremonyError::UploadFailed {
                name: name.to_string(),
                reason: e.to_string(),
            })?;
        debug!(artifact = %name, path = %host_path.display(), "uploaded");
        Ok(())
    }

    /// Checks mounts exist and claims capture slots before running, then
    /// turns a non-zero exit into `StepFailed`.
    async fn run_step(
        &self,
        ledger: &ArtifactLedger,
        request: ExecutionRequest,
        steps: &mut Vec<StepRecord>,
    ) -> Result<ExecutionOutput, CeremonyError> {
        for mount in &request.files {
            ledger.require(&mount.artifact)?;
        }
        for slot in &request.store {
            ledger.declare(&slot.name, &request.description)?;
        }

        let step = request.description.clone();
        info!(step = %step, slots = request.store.len(), "running ceremony step");

        let output = self
            .executor
            .run(request)
            .await
            .map_err(|e| CeremonyError::StepFailed {
                step: step.clone(),
                reason: e.to_string(),
            })?;

        if !output.is_success() {
            error!(step = %step, exit_code = output.exit_code, "ceremony step failed");
            return Err(CeremonyError::StepFailed {
                step,
                reason: format!("exit code {}: {}", output.exit_code, output.diagnostics()),
            });
        }

        steps.push(StepRecord {
            description: step,
            exit_code: output.exit_code,
        });
        Ok(output)
    }
}

#[async_trait]
impl<E: RemoteExecutor> GenesisCeremonyApi for GenesisCeremonyService<E> {
    async fn run_ceremony(&self, num_validators: u32, image: &str) -> Result<CeremonyOutcome, CeremonyError> {
        let plan = CeremonyPlan::new(self.config.clone(), self.chain.clone(), num_validators, image)?;
        let span = info_span!("genesis_ceremony", run_id = %Uuid::new_v4(), validators = num_validators);
        self.execute(&plan).instrument(span).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        COLLECT_STEP, DEPOSIT_COUNT_ARTIFACT, FINALIZE_STEP, READ_DEPOSIT_COUNT_STEP,
        READ_DEPOSIT_ROOT_STEP, SHARED_GENESIS_ARTIFACT,
    };
    use crate::ports::{MockExecutor, MOCK_DEPOSIT_ROOT};
    use shared_types::DepositValueError;

    fn service(executor: MockExecutor, config: CeremonyConfig) -> (GenesisCeremonyService<MockExecutor>, Arc<MockExecutor>) {
        let executor = Arc::new(executor);
        (
            GenesisCeremonyService::new(config, ChainParams::default(), executor.clone()),
            executor,
        )
    }

    #[tokio::test]
    async fn test_steps_run_in_order() {
        let (service, executor) = service(MockExecutor::new(), CeremonyConfig::default());
        let outcome = service.run_ceremony(4, "beacond:test").await.unwrap();

        assert_eq!(
            executor.descriptions(),
            vec![
                COLLECT_STEP,
                FINALIZE_STEP,
                READ_DEPOSIT_COUNT_STEP,
                READ_DEPOSIT_ROOT_STEP
            ]
        );
        assert_eq!(outcome.steps.len(), 4);
        assert_eq!(outcome.deposits.deposit_root.as_str(), MOCK_DEPOSIT_ROOT);
        assert_eq!(outcome.final_genesis.as_str(), MERGED_GENESIS_ARTIFACT);
    }

    #[tokio::test]
    async fn test_reserves_n_plus_one_slots_and_two_reads() {
        for n in [1u32, 3, 7] {
            let (service, executor) = service(MockExecutor::new(), CeremonyConfig::default());
            let outcome = service.run_ceremony(n, "beacond").await.unwrap();

            let requests = executor.requests();
            assert_eq!(requests[0].store.len(), n as usize + 1);
            assert_eq!(requests[0].env[env_keys::NUM_VALS], n.to_string());

            let reads = requests
                .iter()
                .filter(|r| r.command.starts_with("cat "))
                .count();
            assert_eq!(reads, 2);
            assert_eq!(outcome.num_validators(), n as usize);
            assert_eq!(
                outcome.validator_configs.last().map(|a| a.to_string()),
                Some(format!("node-beacond-config-{}", n - 1))
            );
        }
    }

    #[tokio::test]
    async fn test_uploads_each_input_once() {
        let (service, executor) = service(MockExecutor::new(), CeremonyConfig::default());
        service.run_ceremony(2, "beacond").await.unwrap();

        let names: Vec<String> = executor
            .uploads()
            .iter()
            .map(|(_, name)| name.to_string())
            .collect();
        assert_eq!(
            names,
            vec![COLLECT_SCRIPT_ARTIFACT, FINALIZE_SCRIPT_ARTIFACT, EL_GENESIS_ARTIFACT]
        );
    }

    #[tokio::test]
    async fn test_deposit_values_verbatim() {
        let executor = MockExecutor::new()
            .with_output(READ_DEPOSIT_COUNT_STEP, "0x2a\n")
            .with_output(READ_DEPOSIT_ROOT_STEP, "0xdeadbeef\n");
        let (service, _) = service(executor, CeremonyConfig::for_testing());
        let outcome = service.run_ceremony(2, "beacond").await.unwrap();

        assert_eq!(outcome.env[env_keys::DEPOSIT_COUNT], "0x2a");
        assert_eq!(outcome.env[env_keys::DEPOSIT_ROOT], "0xdeadbeef");

        let inputs = outcome.genesis_inputs();
        assert_eq!(inputs.deposits, Some(outcome.deposits.clone()));
        assert_eq!(inputs.validator_configs.len(), 2);
    }

    #[tokio::test]
    async fn test_stderr_noise_does_not_corrupt_reads() {
        let executor = MockExecutor::new()
            .with_output(READ_DEPOSIT_COUNT_STEP, "0x2a\n")
            .with_stderr(READ_DEPOSIT_COUNT_STEP, "warning: home directory not writable\n")
            .with_stderr(READ_DEPOSIT_ROOT_STEP, "level=warn msg=deprecated flag\n");
        let (service, _) = service(executor, CeremonyConfig::default());
        let outcome = service.run_ceremony(1, "beacond").await.unwrap();

        assert_eq!(outcome.deposits.deposit_count.as_str(), "0x2a");
        assert_eq!(outcome.deposits.deposit_root.as_str(), MOCK_DEPOSIT_ROOT);
    }

    #[tokio::test]
    async fn test_empty_read_fails() {
        let executor = MockExecutor::new().with_output(READ_DEPOSIT_ROOT_STEP, "\n");
        let (service, _) = service(executor, CeremonyConfig::for_testing());
        let err = service.run_ceremony(1, "beacond").await.unwrap_err();
        assert!(matches!(
            err,
            CeremonyError::InvalidDepositValue(DepositValueError::Empty { .. })
        ));
    }

    #[tokio::test]
    async fn test_non_hex_read_fails() {
        let executor = MockExecutor::new().with_output(READ_DEPOSIT_COUNT_STEP, "0xzz\n");
        let (service, _) = service(executor, CeremonyConfig::for_testing());
        let err = service.run_ceremony(1, "beacond").await.unwrap_err();
        assert!(matches!(
            err,
            CeremonyError::InvalidDepositValue(DepositValueError::InvalidHex { .. })
        ));
    }

    #[tokio::test]
    async fn test_short_root_rejected_when_strict() {
        let executor = MockExecutor::new().with_output(READ_DEPOSIT_ROOT_STEP, "0xdeadbeef\n");
        let (service, _) = service(executor, CeremonyConfig::default());
        let err = service.run_ceremony(1, "beacond").await.unwrap_err();
        assert!(matches!(
            err,
            CeremonyError::InvalidDepositValue(DepositValueError::IncorrectLength { .. })
        ));
    }

    #[tokio::test]
    async fn test_failing_collect_aborts() {
        let (service, executor) = service(
            MockExecutor::new().failing_step(COLLECT_STEP),
            CeremonyConfig::default(),
        );
        let err = service.run_ceremony(3, "beacond").await.unwrap_err();

        match err {
            CeremonyError::StepFailed { step, reason } => {
                assert_eq!(step, COLLECT_STEP);
                assert!(reason.contains("exit code 1"));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(executor.descriptions(), vec![COLLECT_STEP]);
    }

    #[tokio::test]
    async fn test_launch_failure_names_step() {
        let (service, executor) = service(
            MockExecutor::new().broken_step(FINALIZE_STEP),
            CeremonyConfig::default(),
        );
        let err = service.run_ceremony(1, "beacond").await.unwrap_err();
        assert!(err.to_string().contains(FINALIZE_STEP));
        assert_eq!(executor.requests().len(), 2);
    }

    #[tokio::test]
    async fn test_zero_validators_rejected_before_any_step() {
        let (service, executor) = service(MockExecutor::new(), CeremonyConfig::default());
        let err = service.run_ceremony(0, "beacond").await.unwrap_err();
        assert!(matches!(err, CeremonyError::NoValidators));
        assert!(executor.requests().is_empty());
        assert!(executor.uploads().is_empty());
    }

    #[tokio::test]
    async fn test_finalize_mounts_phase_one_genesis() {
        let (service, executor) = service(MockExecutor::new(), CeremonyConfig::default());
        service.run_ceremony(1, "beacond").await.unwrap();

        let finalize = &executor.requests()[1];
        assert!(finalize
            .files
            .iter()
            .any(|m| m.artifact.as_str() == SHARED_GENESIS_ARTIFACT));
        assert!(finalize
            .store
            .iter()
            .any(|s| s.name.as_str() == DEPOSIT_COUNT_ARTIFACT));
    }
}

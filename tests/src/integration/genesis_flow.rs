//! # Genesis Flow
//!
//! Ceremony, then assembly of every node, then the manifest.

#[cfg(test)]
mod tests {
    use dn_01_node_config::env_keys;
    use dn_02_genesis_ceremony::domain::{
        COLLECT_STEP, FINALIZE_STEP, READ_DEPOSIT_COUNT_STEP, READ_DEPOSIT_ROOT_STEP,
    };
    use dn_02_genesis_ceremony::{CeremonyConfig, MockExecutor, MERGED_GENESIS_ARTIFACT};
    use dn_02_genesis_ceremony::ports::MOCK_DEPOSIT_ROOT;
    use shared_types::ArtifactName;

    use crate::integration::fixtures::{config, orchestrator};

    #[tokio::test]
    async fn test_genesis_assembles_every_node() {
        let mut config = config(3, 1, 2);
        config.topology.bootstrap_node_ids = vec!["seed0".to_string()];
        let (orchestrator, executor, _) = orchestrator(config, MockExecutor::new());

        let manifest = orchestrator.run_genesis().await.unwrap();

        assert_eq!(manifest.services.len(), 6);
        assert_eq!(manifest.persistent_peers, "seed0@10.0.0.1:26656");
        assert_eq!(
            executor.descriptions(),
            vec![
                COLLECT_STEP,
                FINALIZE_STEP,
                READ_DEPOSIT_COUNT_STEP,
                READ_DEPOSIT_ROOT_STEP
            ]
        );

        let merged = ArtifactName::new(MERGED_GENESIS_ARTIFACT);
        for service in &manifest.services {
            assert!(service.mount_for(&merged).is_some(), "{} lacks final genesis", service.name);
            assert_eq!(
                service.env_var(env_keys::PERSISTENT_PEERS),
                Some("seed0@10.0.0.1:26656")
            );
        }

        let validator = manifest.service("cl-validator-beaconkit-2").unwrap();
        assert!(!validator.command.has_init());
        assert_eq!(validator.env_var(env_keys::DEPOSIT_ROOT), Some(MOCK_DEPOSIT_ROOT));
        assert!(validator
            .mount_for(&ArtifactName::new("node-beacond-config-2"))
            .is_some());

        let seed = manifest.service("cl-seed-beaconkit-0").unwrap();
        assert!(seed.command.has_init());
        assert!(seed.command.render().contains("--p2p.seed_mode"));
    }

    #[tokio::test]
    async fn test_node_inputs_uploaded_before_ceremony() {
        let (orchestrator, executor, _) = orchestrator(config(1, 0, 0), MockExecutor::new());
        orchestrator.run_genesis().await.unwrap();

        let uploads: Vec<String> = executor
            .uploads()
            .iter()
            .map(|(_, name)| name.to_string())
            .collect();
        assert_eq!(&uploads[..2], &["jwt_file", "kzg_trusted_setup"]);
    }

    #[tokio::test]
    async fn test_deposit_values_reach_every_validator_verbatim() {
        let mut config = config(3, 0, 0);
        config.ceremony = CeremonyConfig::for_testing();
        let executor = MockExecutor::new()
            .with_output(READ_DEPOSIT_COUNT_STEP, "0x2a\n")
            .with_output(READ_DEPOSIT_ROOT_STEP, "0xdeadbeef\n");
        let (orchestrator, _, _) = orchestrator(config, executor);

        let manifest = orchestrator.run_genesis().await.unwrap();
        for service in &manifest.services {
            assert_eq!(service.env_var(env_keys::DEPOSIT_COUNT), Some("0x2a"));
            assert_eq!(service.env_var(env_keys::DEPOSIT_ROOT), Some("0xdeadbeef"));
        }
    }

    #[tokio::test]
    async fn test_failed_step_aborts_before_assembly() {
        let (orchestrator, executor, _) = orchestrator(
            config(2, 1, 0),
            MockExecutor::new().failing_step(FINALIZE_STEP),
        );

        let err = orchestrator.run_genesis().await.unwrap_err();
        assert!(format!("{:#}", err).contains(FINALIZE_STEP));
        assert_eq!(executor.descriptions(), vec![COLLECT_STEP, FINALIZE_STEP]);
    }

    #[tokio::test]
    async fn test_malformed_deposit_root_aborts() {
        let executor = MockExecutor::new().with_output(READ_DEPOSIT_ROOT_STEP, "deadbeef\n");
        let (orchestrator, _, _) = orchestrator(config(1, 0, 0), executor);

        let err = orchestrator.run_genesis().await.unwrap_err();
        assert!(format!("{:#}", err).contains("deposit_root"));
    }

    #[tokio::test]
    async fn test_unscheduled_bootstrap_seed_aborts() {
        let mut config = config(1, 1, 0);
        config.topology.bootstrap_node_ids = vec!["a".to_string(), "b".to_string()];
        let (orchestrator, _, _) = orchestrator(config, MockExecutor::new());

        let err = orchestrator.run_genesis().await.unwrap_err();
        assert!(format!("{:#}", err).contains("cl-seed-beaconkit-1"));
    }

    #[tokio::test]
    async fn test_manifest_written_as_json() {
        let (orchestrator, _, _) = orchestrator(config(2, 1, 0), MockExecutor::new());
        let manifest = orchestrator.run_genesis().await.unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out/manifest.json");
        manifest.write_to(&path).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["services"].as_array().map(Vec::len), Some(3));
        assert_eq!(json["final_genesis"], MERGED_GENESIS_ARTIFACT);
        assert_eq!(json["ceremony_steps"].as_array().map(Vec::len), Some(4));
    }
}

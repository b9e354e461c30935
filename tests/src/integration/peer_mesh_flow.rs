//! # Peer Mesh Flow
//!
//! Static persistent-peer resolution and dynamic dial through the
//! orchestrator.

#[cfg(test)]
mod tests {
    use dn_02_genesis_ceremony::MockExecutor;

    use crate::integration::fixtures::{config, orchestrator, seed_ip};

    #[test]
    fn test_persistent_peers_resolve_in_seed_order() {
        let mut config = config(1, 2, 0);
        config.topology.bootstrap_node_ids = vec!["abc".to_string(), "def".to_string()];
        let (orchestrator, _, _) = orchestrator(config, MockExecutor::new());

        assert_eq!(
            orchestrator.persistent_peers().unwrap(),
            "abc@10.0.0.1:26656,def@10.0.0.2:26656"
        );
    }

    #[tokio::test]
    async fn test_dial_from_seed_batches_all_targets() {
        let (orchestrator, _, control) = orchestrator(config(4, 1, 24), MockExecutor::new());

        let report = orchestrator.dial_from_seed(0).await.unwrap();

        let calls = control.calls();
        assert_eq!(calls.len(), 2);
        assert!(calls.iter().all(|(target, _)| *target == seed_ip(0)));
        assert_eq!(calls[0].1.peers.len(), 20);
        assert_eq!(calls[1].1.peers.len(), 8);
        assert_eq!(
            calls[0].1.peers[0],
            "cl-validator-beaconkit-0-id@10.0.1.1:26656"
        );
        assert!(report.is_complete_success());
        assert_eq!(report.peers_dialed(), 28);
    }

    #[tokio::test]
    async fn test_dial_unknown_seed_fails() {
        let (orchestrator, _, control) = orchestrator(config(2, 1, 0), MockExecutor::new());
        let err = orchestrator.dial_from_seed(5).await.unwrap_err();
        assert!(format!("{:#}", err).contains("cl-seed-beaconkit-5"));
        assert!(control.calls().is_empty());
    }
}

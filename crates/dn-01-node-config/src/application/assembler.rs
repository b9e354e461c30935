//! # Node Config Assembler
//!
//! Turns a `NodeDescriptor` plus ceremony results into a `ServiceConfig`.
//! Pure: no network or file I/O.

use std::collections::BTreeMap;

use shared_types::{ArtifactName, ChainParams, FileMount, NodeDescriptor, NodeRole};
use tracing::debug;

use crate::config::AssemblerConfig;
use crate::domain::{
    env_keys, genesis_env, published_ports, AssemblyError, GenesisInputs, InitArgs, InstallArgs,
    ServiceConfig, StartArgs, StartupCommand,
};

/// Builds startup configs for every role.
#[derive(Debug, Clone)]
pub struct NodeConfigAssembler {
    config: AssemblerConfig,
    chain: ChainParams,
}

impl NodeConfigAssembler {
    pub fn new(config: AssemblerConfig, chain: ChainParams) -> Self {
        Self { config, chain }
    }

    pub fn config(&self) -> &AssemblerConfig {
        &self.config
    }

    /// Assemble the startup config of `node`.
    ///
    /// Validators require `genesis.deposits` and a config artifact for their
    /// index; seeds and full nodes do not.
    pub fn assemble(
        &self,
        node: &NodeDescriptor,
        engine_dial_url: &str,
        persistent_peers: &str,
        genesis: &GenesisInputs,
    ) -> Result<ServiceConfig, AssemblyError> {
        let service = node.service_key().service_name();

        let validator_artifact = match node.validator_index() {
            Some(index) => {
                if genesis.deposits.is_none() {
                    return Err(AssemblyError::MissingDepositData { service });
                }
                let artifact = genesis
                    .validator_configs
                    .get(index as usize)
                    .cloned()
                    .ok_or(AssemblyError::MissingValidatorConfig { index })?;
                Some(artifact)
            }
            None => None,
        };

        let mut env = genesis_env(&service, &self.chain, &self.config.home, engine_dial_url);
        env.insert(env_keys::PERSISTENT_PEERS.into(), persistent_peers.into());
        if let Some(deposits) = &genesis.deposits {
            env.insert(
                env_keys::DEPOSIT_COUNT.into(),
                deposits.deposit_count.as_str().into(),
            );
            env.insert(
                env_keys::DEPOSIT_ROOT.into(),
                deposits.deposit_root.as_str().into(),
            );
        }

        let command = StartupCommand::for_role(
            node.role(),
            node.validator_index(),
            self.init_args(&service),
            self.install_args(),
            self.start_args(!persistent_peers.is_empty()),
        );

        let files = self.file_mounts(validator_artifact, &genesis.final_genesis);

        let mut labels = BTreeMap::new();
        labels.insert("node-role".to_string(), node.role().to_string());
        labels.insert("node-index".to_string(), node.ordinal().to_string());
        labels.extend(node.labels().clone());

        debug!(
            service = %service,
            role = %node.role(),
            init = command.has_init(),
            mounts = files.len(),
            "node config assembled"
        );

        Ok(ServiceConfig {
            name: service,
            image: node.image().to_string(),
            command,
            files,
            ports: published_ports(self.config.expose_ports),
            env,
            labels,
            node_selectors: node.node_selectors().clone(),
            resources: node.resources(),
        })
    }

    fn init_args(&self, moniker: &str) -> InitArgs {
        InitArgs {
            binary: self.config.binary.clone(),
            home: self.config.home.clone(),
            moniker: moniker.to_string(),
            chain_id: self.chain.chain_id.clone(),
            chain_spec: self.chain.chain_spec.clone(),
            genesis_path: self.config.genesis_path(),
        }
    }

    fn install_args(&self) -> InstallArgs {
        InstallArgs {
            staged_path: self.config.staged_genesis_path.clone(),
            genesis_path: self.config.genesis_path(),
        }
    }

    fn start_args(&self, with_persistent_peers: bool) -> StartArgs {
        StartArgs {
            binary: self.config.binary.clone(),
            home: self.config.home.clone(),
            jwt_path: self.config.jwt_path.clone(),
            trusted_setup_path: self.config.trusted_setup_path.clone(),
            kzg_implementation: self.config.kzg_implementation.clone(),
            node_api_address: self.config.node_api_address.clone(),
            seed_mode: false,
            validator_index: None,
            with_persistent_peers,
        }
    }

    /// The final genesis goes to the staging path; the start command copies
    /// it into place after init.
    fn file_mounts(&self, validator_artifact: Option<ArtifactName>, final_genesis: &ArtifactName) -> Vec<FileMount> {
        let mut files = Vec::with_capacity(4);
        if let Some(artifact) = validator_artifact {
            files.push(FileMount::new(self.config.home.clone(), artifact));
        }
        files.push(FileMount::new(
            self.config.staged_genesis_path.clone(),
            final_genesis.clone(),
        ));
        files.push(FileMount::new(
            self.config.jwt_path.clone(),
            ArtifactName::new(self.config.jwt_artifact.clone()),
        ));
        files.push(FileMount::new(
            self.config.trusted_setup_path.clone(),
            ArtifactName::new(self.config.trusted_setup_artifact.clone()),
        ));
        files
    }
}

/// Roles that run the init step before starting.
pub fn initializes(role: NodeRole) -> bool {
    !matches!(role, NodeRole::Validator)
}

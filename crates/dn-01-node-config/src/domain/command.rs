//! # Startup Command Builder
//!
//! A node's startup command is an ordered list of typed steps. The role
//! decides the steps; rendering to a shell string is a separate concern.
//!
//! ```text
//! seed      : InitIfAbsent -> InstallGenesis -> Start { seed_mode }
//! full      : InitIfAbsent -> InstallGenesis -> Start
//! validator : InstallGenesis -> Start { validator_index }
//! ```
//!
//! The final genesis is mounted at a staging path, never at the path the
//! init guard tests, so init still runs on a fresh home.

use serde::Serialize;
use shared_types::NodeRole;

use super::catalog::env_keys;

/// Arguments of the idempotent init step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InitArgs {
    pub binary: String,
    pub home: String,
    pub moniker: String,
    pub chain_id: String,
    pub chain_spec: String,
    /// Init is skipped when this file already exists.
    pub genesis_path: String,
}

/// Copy the staged final genesis over the node's genesis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstallArgs {
    /// Mount path of the ceremony's final genesis.
    pub staged_path: String,
    /// Genesis the node reads; also the init guard.
    pub genesis_path: String,
}

impl InstallArgs {
    fn genesis_dir(&self) -> &str {
        match self.genesis_path.rsplit_once('/') {
            Some(("", _)) => "/",
            Some((dir, _)) => dir,
            None => ".",
        }
    }
}

/// Arguments of the node start step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StartArgs {
    pub binary: String,
    pub home: String,
    pub jwt_path: String,
    pub trusted_setup_path: String,
    pub kzg_implementation: String,
    pub node_api_address: String,
    pub seed_mode: bool,
    pub validator_index: Option<u32>,
    /// Pass `--p2p.persistent_peers` from the environment.
    pub with_persistent_peers: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum StartupStep {
    InitIfAbsent(InitArgs),
    InstallGenesis(InstallArgs),
    Start(StartArgs),
}

impl StartupStep {
    /// Shell rendering of this step.
    pub fn render(&self) -> String {
        match self {
            Self::InitIfAbsent(init) => format!(
                "if [ ! -f {genesis} ]; then {bin} init {moniker} --chain-id {chain} \
                 --beacon-kit.chain-spec {spec} --home {home}; fi",
                genesis = init.genesis_path,
                bin = init.binary,
                moniker = init.moniker,
                chain = init.chain_id,
                spec = init.chain_spec,
                home = init.home,
            ),
            Self::InstallGenesis(install) => format!(
                "mkdir -p {dir} && cp {staged} {genesis}",
                dir = install.genesis_dir(),
                staged = install.staged_path,
                genesis = install.genesis_path,
            ),
            Self::Start(start) => {
                let mut cmd = format!(
                    "{bin} start --home {home} \
                     --beacon-kit.engine.jwt-secret-path={jwt} \
                     --beacon-kit.kzg.implementation={kzg} \
                     --beacon-kit.kzg.trusted-setup-path={setup} \
                     --beacon-kit.node-api.enabled \
                     --beacon-kit.node-api.address={api} \
                     --pruning=nothing",
                    bin = start.binary,
                    home = start.home,
                    jwt = start.jwt_path,
                    kzg = start.kzg_implementation,
                    setup = start.trusted_setup_path,
                    api = start.node_api_address,
                );
                if start.seed_mode {
                    cmd.push_str(" --p2p.seed_mode");
                }
                if start.with_persistent_peers {
                    cmd.push_str(&format!(
                        " --p2p.persistent_peers \"${}\"",
                        env_keys::PERSISTENT_PEERS
                    ));
                }
                cmd
            }
        }
    }
}

/// Ordered startup steps for one node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StartupCommand {
    steps: Vec<StartupStep>,
}

impl StartupCommand {
    /// Steps for `role`.
    ///
    /// Validators never initialize: their home comes from the ceremony.
    /// Every role installs the final genesis right before starting.
    /// `start.seed_mode` and `start.validator_index` are set from the role.
    pub fn for_role(
        role: NodeRole,
        validator_index: Option<u32>,
        init: InitArgs,
        install: InstallArgs,
        start: StartArgs,
    ) -> Self {
        let steps = match role {
            NodeRole::Validator => vec![
                StartupStep::InstallGenesis(install),
                StartupStep::Start(StartArgs {
                    seed_mode: false,
                    validator_index,
                    ..start
                }),
            ],
            NodeRole::Seed => vec![
                StartupStep::InitIfAbsent(init),
                StartupStep::InstallGenesis(install),
                StartupStep::Start(StartArgs {
                    seed_mode: true,
                    validator_index: None,
                    ..start
                }),
            ],
            NodeRole::Full => vec![
                StartupStep::InitIfAbsent(init),
                StartupStep::InstallGenesis(install),
                StartupStep::Start(StartArgs {
                    seed_mode: false,
                    validator_index: None,
                    ..start
                }),
            ],
        };
        Self { steps }
    }

    pub fn steps(&self) -> &[StartupStep] {
        &self.steps
    }

    pub fn has_init(&self) -> bool {
        self.steps
            .iter()
            .any(|s| matches!(s, StartupStep::InitIfAbsent(_)))
    }

    /// Validator index carried by the start step, if any.
    pub fn validator_index(&self) -> Option<u32> {
        self.steps.iter().find_map(|s| match s {
            StartupStep::Start(start) => start.validator_index,
            _ => None,
        })
    }

    /// Path the init step's guard tests, if the command initializes.
    pub fn init_guard_path(&self) -> Option<&str> {
        self.steps.iter().find_map(|s| match s {
            StartupStep::InitIfAbsent(init) => Some(init.genesis_path.as_str()),
            _ => None,
        })
    }

    /// Full shell command, steps joined with `&&`.
    pub fn render(&self) -> String {
        self.steps
            .iter()
            .map(StartupStep::render)
            .collect::<Vec<_>>()
            .join(" && ")
    }

    /// `sh -c` argv for the container.
    pub fn to_argv(&self) -> Vec<String> {
        vec!["sh".to_string(), "-c".to_string(), self.render()]
    }
}

//! # Devnet Runtime
//!
//! Bootstraps a multi-node consensus devnet.
//!
//! ## Commands
//!
//! 1. `genesis` - run the genesis ceremony, assemble every node's startup
//!    config and write the manifest.
//! 2. `peers` - print the persistent-peer string for the bootstrap ids.
//! 3. `dial` - ask a live seed to dial every validator and full node.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use dn_telemetry::{init_telemetry, TelemetryConfig};
use shared_types::{InMemoryServiceRegistry, ServiceRegistry};
use tracing::{info, warn};

use devnet_runtime::adapters::{DockerExecutor, FileServiceRegistry, HttpPeerControl};
use devnet_runtime::{load_config, DevnetConfig, DevnetOrchestrator};

/// Devnet bootstrap coordinator
#[derive(Parser, Debug)]
#[command(name = "devnet-runtime")]
#[command(about = "Genesis ceremony and peer mesh bootstrap for a consensus devnet")]
struct Args {
    /// TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Print Prometheus metrics when the command finishes
    #[arg(long, global = true)]
    print_metrics: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the genesis ceremony and write the node manifest
    Genesis {
        /// Override the manifest output path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the persistent-peer string
    Peers,
    /// Dial every validator and full node from a live seed
    Dial {
        /// Seed ordinal to dial from
        #[arg(short, long, default_value = "0")]
        seed: u32,
    },
}

/// Registry snapshot if the scheduler has written one.
fn load_registry(config: &DevnetConfig, required: bool) -> Result<Arc<dyn ServiceRegistry>> {
    if config.registry_path.exists() {
        let registry = FileServiceRegistry::load(&config.registry_path)?;
        return Ok(Arc::new(registry));
    }
    if required {
        bail!(
            "service registry {} not found; schedule the seeds first",
            config.registry_path.display()
        );
    }
    warn!(path = %config.registry_path.display(), "no service registry yet");
    Ok(Arc::new(InMemoryServiceRegistry::new()))
}

fn orchestrator(config: DevnetConfig, registry_required: bool) -> Result<DevnetOrchestrator<DockerExecutor, HttpPeerControl>> {
    let registry = load_registry(&config, registry_required)?;
    let executor = Arc::new(DockerExecutor::new(config.docker.clone()));
    let control = Arc::new(HttpPeerControl::new(&config.control_api)?);
    Ok(DevnetOrchestrator::new(config, executor, control, registry))
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let telemetry = init_telemetry(TelemetryConfig::from_env())?;

    let config = load_config(args.config.as_deref()).context("Failed to load configuration")?;

    match args.command {
        Command::Genesis { output } => {
            config.validate()?;
            let needs_registry = !config.topology.bootstrap_node_ids.is_empty();
            let output = output.unwrap_or_else(|| config.manifest_path.clone());

            let manifest = orchestrator(config, needs_registry)?.run_genesis().await?;
            manifest.write_to(&output)?;
            info!(
                path = %output.display(),
                services = manifest.services.len(),
                "manifest written"
            );
        }
        Command::Peers => {
            let peers = orchestrator(config, true)?.persistent_peers()?;
            println!("{}", peers);
        }
        Command::Dial { seed } => {
            let report = orchestrator(config, true)?.dial_from_seed(seed).await?;
            info!(
                batches = report.batches.len(),
                failed = report.failed(),
                skipped = report.skipped,
                peers = report.peers_dialed(),
                "dial finished"
            );
            if let Some(error) = report.first_error() {
                warn!(error = %error, "some dial batches failed");
            }
        }
    }

    if args.print_metrics {
        println!("{}", telemetry.metrics().gather()?);
    }
    Ok(())
}

use govsim::cli::{Cli, Command};
use govsim::config::{Context, Settings};
use govsim::network;
use govsim::output;
use govsim::simulation::{DriverError, SimulationDriver, VotingRoundSimulation};

use clap::Parser;
use std::sync::Arc;

/// Main entry point for govsim
#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Initialize tracing
    reth_tracing::init_test_tracing();

    let cli = Cli::parse();

    // Settings are read once here; everything downstream receives the context by reference.
    let settings = Settings::from_cli(&cli);
    let context = Context::load(settings)?;

    match cli.command {
        Command::RunSimulation { voters, network, epoch_duration } => {
            output::print_banner(context.settings());
            output::print_pool_summary(context.pool());

            let handle = context.registry().resolve(&network)?;
            output::print_network_selected(&handle);

            let driver = SimulationDriver::new(VotingRoundSimulation::new(epoch_duration));
            let report = driver
                .run(handle, Arc::clone(context.pool()), voters)
                .await
                .map_err(DriverError::into_report)?;
            output::print_report(&report);
        }
        Command::Networks => {
            output::print_networks(context.registry(), &context.settings().default_network);
        }
        Command::Accounts => {
            output::print_pool_summary(context.pool());
            output::print_accounts(context.pool());
        }
        Command::Genesis { out, network } => {
            let handle = context.registry().resolve(&network)?;
            let genesis = network::local_genesis(&handle)?;
            match out {
                Some(path) => {
                    network::write_genesis_file(&genesis, &path)?;
                    output::print_genesis_written(&path, genesis.alloc.len());
                }
                None => println!("{}", network::genesis_to_json(&genesis)?),
            }
        }
        Command::ShowConfig => {
            let networks: Vec<_> = context.registry().profiles().to_vec();
            let view = serde_json::json!({
                "settings": context.settings(),
                "accounts": context.pool().len(),
                "networks": networks,
            });
            println!("{}", serde_json::to_string_pretty(&view)?);
        }
    }

    Ok(())
}

use clap::{Parser, Subcommand};
use std::num::NonZeroU64;
use std::path::PathBuf;

use crate::constants::{
    DEFAULT_CORPUS_PATH, DEFAULT_EPOCH_DURATION, DEFAULT_NETWORK, DEFAULT_VOTERS,
};

/// CLI arguments for govsim
#[derive(Parser, Debug)]
#[command(name = "govsim", about = "Devnet account pool and governance-voting simulation")]
pub struct Cli {
    /// Task to run
    #[command(subcommand)]
    pub command: Command,

    /// Pre-generated account corpus (JSON array of `{privateKey, balance?}` records)
    #[arg(long, global = true, default_value = DEFAULT_CORPUS_PATH)]
    pub corpus: PathBuf,

    /// Deployer private key, placed at index 0 of the account pool.
    /// Can also be set via DEPLOYER_PRIVATE_KEY environment variable.
    #[arg(long, global = true, env = "DEPLOYER_PRIVATE_KEY", hide_env_values = true)]
    pub deployer_key: Option<String>,

    /// Genesis governance private key.
    /// Can also be set via GENESIS_GOVERNANCE_PRIVATE_KEY environment variable.
    #[arg(long, global = true, env = "GENESIS_GOVERNANCE_PRIVATE_KEY", hide_env_values = true)]
    pub genesis_governance_key: Option<String>,

    /// Governance private key.
    /// Can also be set via GOVERNANCE_PRIVATE_KEY environment variable.
    #[arg(long, global = true, env = "GOVERNANCE_PRIVATE_KEY", hide_env_values = true)]
    pub governance_key: Option<String>,

    /// Remote-fork execution mode; only the value `true` enables it.
    /// Shrinks the corpus slice from 2000 to 150 accounts.
    #[arg(long, global = true, env = "TENDERLY")]
    pub tenderly: Option<String>,

    /// RPC endpoint override for `staging`
    #[arg(long, global = true, env = "STAGING_RPC")]
    pub staging_rpc: Option<String>,

    /// RPC endpoint override for `songbird`
    #[arg(long, global = true, env = "SONGBIRD_RPC")]
    pub songbird_rpc: Option<String>,

    /// RPC endpoint override for `flare`
    #[arg(long, global = true, env = "FLARE_RPC")]
    pub flare_rpc: Option<String>,

    /// RPC endpoint override for `coston`
    #[arg(long, global = true, env = "COSTON_RPC")]
    pub coston_rpc: Option<String>,

    /// RPC endpoint override for `coston2`
    #[arg(long, global = true, env = "COSTON2_RPC")]
    pub coston2_rpc: Option<String>,

    /// Test directory override
    #[arg(long, global = true, env = "TEST_PATH")]
    pub test_path: Option<String>,
}

/// Available tasks
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Runs local simulation.
    RunSimulation {
        /// Number of voters to simulate
        #[arg(long, default_value_t = DEFAULT_VOTERS)]
        voters: usize,

        /// Network to run against
        #[arg(long, default_value = DEFAULT_NETWORK)]
        network: String,

        /// Voting epoch length in seconds
        #[arg(long, default_value_t = DEFAULT_EPOCH_DURATION)]
        epoch_duration: NonZeroU64,
    },

    /// List network profiles.
    Networks,

    /// List the account pool (addresses and balances only).
    Accounts,

    /// Export the in-process network as a genesis file.
    Genesis {
        /// Output file; prints to stdout when omitted
        #[arg(long)]
        out: Option<PathBuf>,

        /// In-process network to export
        #[arg(long, default_value = DEFAULT_NETWORK)]
        network: String,
    },

    /// Print the resolved configuration as JSON (keys redacted).
    ShowConfig,
}

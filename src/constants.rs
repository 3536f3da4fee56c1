use std::num::NonZeroU64;

/// Default path of the pre-generated account corpus
pub const DEFAULT_CORPUS_PATH: &str = "deployment/test-1020-accounts.json";
/// Corpus slice size for local execution
pub const LOCAL_CORPUS_LIMIT: usize = 2000;
/// Corpus slice size under the remote-fork execution mode
pub const REMOTE_FORK_CORPUS_LIMIT: usize = 150;
/// Voter count used when `run-simulation` is invoked without `--voters`
pub const DEFAULT_VOTERS: usize = 4;
/// Network selected when none is given
pub const DEFAULT_NETWORK: &str = "hardhat";
/// RPC timeout shared by the remote profiles
pub const REMOTE_RPC_TIMEOUT_MS: u64 = 40_000;
/// Chain ID of the in-process and local node profiles
pub const LOCAL_CHAIN_ID: u64 = 31337;
/// Start date of the in-process chain (UTC midnight)
pub const LOCAL_INITIAL_DATE: &str = "2021-01-01";
/// Block gas ceiling of the in-process chain (10x mainnet)
pub const LOCAL_BLOCK_GAS_LIMIT: u64 = 125_000_000;
/// Default voting epoch length in seconds
pub const DEFAULT_EPOCH_DURATION_SECS: u64 = 180;
/// [`DEFAULT_EPOCH_DURATION_SECS`] as the type the CLI and voting routine take
pub const DEFAULT_EPOCH_DURATION: NonZeroU64 = match NonZeroU64::new(DEFAULT_EPOCH_DURATION_SECS) {
    Some(duration) => duration,
    None => panic!("default epoch duration must be non-zero"),
};

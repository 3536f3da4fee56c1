//! Simulation Task Driver
//!
//! Validates a voter count against the account pool and hands the request to a
//! [`SimulationRoutine`]. The driver performs no chain interaction itself.
//! It does not retry either: a voting round is not idempotent, and re-running
//! after a partial failure would cast votes twice.

pub mod ballot;
pub mod errors;
pub mod voting;

pub use ballot::Ballot;
pub use errors::{BallotError, DriverError};
pub use voting::{SimulationReport, VotingRoundSimulation};

use async_trait::async_trait;
use reth_tracing::tracing::info;
use std::num::NonZeroUsize;
use std::sync::Arc;

use crate::accounts::AccountPool;
use crate::errors::ConfigError;
use crate::network::NetworkHandle;

/// A validated simulation request
#[derive(Debug, Clone)]
pub struct SimulationRequest {
    network: NetworkHandle,
    accounts: Arc<AccountPool>,
    voter_count: NonZeroUsize,
}

impl SimulationRequest {
    /// Validate `voter_count` against the accounts eligible to vote. Never clamps.
    pub fn new(
        network: NetworkHandle,
        accounts: Arc<AccountPool>,
        voter_count: usize,
    ) -> Result<Self, ConfigError> {
        let voter_count = NonZeroUsize::new(voter_count).ok_or(ConfigError::InvalidVoterCount)?;
        let eligible = accounts.eligible_voters();
        if voter_count.get() > eligible {
            return Err(ConfigError::TooManyVoters { requested: voter_count.get(), eligible });
        }
        Ok(Self { network, accounts, voter_count })
    }

    /// Target network
    pub fn network(&self) -> &NetworkHandle {
        &self.network
    }

    /// Full account pool, roles selected by position
    pub fn accounts(&self) -> &Arc<AccountPool> {
        &self.accounts
    }

    /// Number of voters to simulate
    pub fn voter_count(&self) -> usize {
        self.voter_count.get()
    }
}

/// Executes a governance-voting scenario for a validated request
#[async_trait]
pub trait SimulationRoutine: Send + Sync {
    /// Result of a completed run
    type Output: Send;

    /// Run the scenario. Errors are reported to the caller untouched.
    async fn run(&self, request: &SimulationRequest) -> eyre::Result<Self::Output>;
}

/// Validating pass-through in front of a [`SimulationRoutine`]
#[derive(Debug)]
pub struct SimulationDriver<R> {
    routine: R,
}

impl<R: SimulationRoutine> SimulationDriver<R> {
    /// Wrap a routine
    pub fn new(routine: R) -> Self {
        Self { routine }
    }

    /// The wrapped routine
    pub fn routine(&self) -> &R {
        &self.routine
    }

    /// Validate and run once
    pub async fn run(
        &self,
        network: NetworkHandle,
        accounts: Arc<AccountPool>,
        voter_count: usize,
    ) -> Result<R::Output, DriverError> {
        let request = SimulationRequest::new(network, accounts, voter_count)?;

        info!(
            target: "govsim::simulation",
            network = request.network().name(),
            voters = request.voter_count(),
            accounts = request.accounts().len(),
            "Starting simulation"
        );

        self.routine.run(&request).await.map_err(DriverError::Execution)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accounts::{max_balance, source::keyed_account, KeySource};
    use crate::config::RpcOverrides;
    use crate::network::NetworkRegistry;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Counts invocations and optionally fails
    #[derive(Default)]
    struct Probe {
        calls: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl SimulationRoutine for Probe {
        type Output = (usize, usize);

        async fn run(&self, request: &SimulationRequest) -> eyre::Result<Self::Output> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                eyre::bail!("vote reverted");
            }
            Ok((request.voter_count(), request.accounts().len()))
        }
    }

    /// Fails with a layered report
    struct Layered;

    #[async_trait]
    impl SimulationRoutine for Layered {
        type Output = ();

        async fn run(&self, _request: &SimulationRequest) -> eyre::Result<()> {
            Err(eyre::eyre!("vote reverted").wrap_err("cast ballot #2"))
        }
    }

    fn setup(with_deployer: bool, corpus_len: u64) -> (NetworkHandle, Arc<AccountPool>) {
        let deployer = with_deployer.then(|| {
            keyed_account(&format!("{:064x}", 999), KeySource::Deployer, max_balance()).unwrap()
        });
        let corpus = (1..=corpus_len)
            .map(|i| {
                keyed_account(&format!("{i:064x}"), KeySource::Corpus { index: 0 }, max_balance())
                    .unwrap()
            })
            .collect();
        let pool = Arc::new(AccountPool::assemble(deployer, corpus, 100, None, None).unwrap());
        let registry = NetworkRegistry::new(Arc::clone(&pool), &RpcOverrides::default()).unwrap();
        (registry.resolve("hardhat").unwrap(), pool)
    }

    #[tokio::test]
    async fn test_zero_voters_rejected_before_routine() {
        let driver = SimulationDriver::new(Probe::default());
        let (network, pool) = setup(true, 5);

        let err = driver.run(network, pool, 0).await.unwrap_err();

        assert!(matches!(err, DriverError::Config(ConfigError::InvalidVoterCount)));
        assert_eq!(driver.routine().calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_too_many_voters_rejected_before_routine() {
        let driver = SimulationDriver::new(Probe::default());
        let (network, pool) = setup(false, 5);

        let err = driver.run(network, pool, 5).await.unwrap_err();

        match err {
            DriverError::Config(ConfigError::TooManyVoters { requested, eligible }) => {
                assert_eq!(requested, 5);
                assert_eq!(eligible, 4);
            }
            other => panic!("Expected TooManyVoters, got {:?}", other),
        }
        assert_eq!(driver.routine().calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_valid_request_passes_through() {
        let driver = SimulationDriver::new(Probe::default());
        let (network, pool) = setup(true, 5);

        let output = driver.run(network, pool, 5).await.unwrap();

        assert_eq!(output, (5, 6));
        assert_eq!(driver.routine().calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_routine_failure_propagates_without_retry() {
        let driver = SimulationDriver::new(Probe { fail: true, ..Default::default() });
        let (network, pool) = setup(true, 5);

        let err = driver.run(network, pool, 2).await.unwrap_err();

        assert!(matches!(&err, DriverError::Execution(_)));
        assert_eq!(err.to_string(), "vote reverted");
        assert_eq!(driver.routine().calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_execution_report_keeps_causes() {
        let driver = SimulationDriver::new(Layered);
        let (network, pool) = setup(true, 5);

        let err = driver.run(network, pool, 2).await.unwrap_err();
        assert_eq!(err.to_string(), "cast ballot #2");

        let causes: Vec<String> = err.into_report().chain().map(ToString::to_string).collect();
        assert_eq!(causes, vec!["cast ballot #2", "vote reverted"]);
    }

    #[tokio::test]
    async fn test_config_error_into_report() {
        let driver = SimulationDriver::new(Layered);
        let (network, pool) = setup(true, 5);

        let report = driver.run(network, pool, 0).await.unwrap_err().into_report();

        assert!(matches!(
            report.downcast_ref::<DriverError>(),
            Some(DriverError::Config(ConfigError::InvalidVoterCount))
        ));
    }

    #[test]
    fn test_request_accessors() {
        let (network, pool) = setup(true, 3);
        let request = SimulationRequest::new(network, Arc::clone(&pool), 2).unwrap();
        assert_eq!(request.voter_count(), 2);
        assert_eq!(request.network().name(), "hardhat");
        assert!(Arc::ptr_eq(request.accounts(), &pool));
    }
}

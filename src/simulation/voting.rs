use alloy_primitives::{address, Address, Bytes, B256};
use async_trait::async_trait;
use eyre::{ensure, eyre};
use reth_tracing::tracing::{debug, info};
use serde::Serialize;
use std::num::NonZeroU64;

use super::ballot::Ballot;
use super::{SimulationRequest, SimulationRoutine};
use crate::constants::DEFAULT_EPOCH_DURATION;
use crate::devnet::{EpochClock, LocalChain, TxKind};

/// Target of proposal and ballot calls on the in-process chain
pub const BALLOT_BOX_ADDRESS: Address = address!("0000000000000000000000000000000000001000");

/// Calldata that opens a proposal
const PROPOSE_CALLDATA: &[u8] = b"propose";
const PROPOSE_GAS: u64 = 150_000;
const VOTE_GAS: u64 = 80_000;

/// Outcome of one voting round
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationReport {
    /// Network the round ran on
    pub network: String,
    /// Account that opened the proposal
    pub proposer: Address,
    /// Proposal id (hash of the propose transaction)
    pub proposal_id: B256,
    /// Epoch the proposal was opened in
    pub proposal_epoch: u64,
    /// Number of voters
    pub voters: usize,
    /// Ballots in favor
    pub votes_for: usize,
    /// Ballots against
    pub votes_against: usize,
    /// Blocks mined during the round
    pub blocks_mined: u64,
    /// Timestamp of the proposal block
    pub first_block_timestamp: u64,
    /// Timestamp of the last ballot block
    pub last_block_timestamp: u64,
}

/// One governance voting round on the in-process chain.
///
/// The governance authority opens a proposal. The first `voter_count` eligible
/// voters then cast signed ballots, alternating for and against. Every ballot
/// must be mined in the proposal's epoch.
#[derive(Debug, Clone)]
pub struct VotingRoundSimulation {
    epoch_duration: NonZeroU64,
}

impl VotingRoundSimulation {
    /// Round with the given voting epoch length
    pub fn new(epoch_duration: NonZeroU64) -> Self {
        Self { epoch_duration }
    }

    /// Voting epoch length in seconds
    pub fn epoch_duration(&self) -> u64 {
        self.epoch_duration.get()
    }
}

impl Default for VotingRoundSimulation {
    fn default() -> Self {
        Self::new(DEFAULT_EPOCH_DURATION)
    }
}

#[async_trait]
impl SimulationRoutine for VotingRoundSimulation {
    type Output = SimulationReport;

    async fn run(&self, request: &SimulationRequest) -> eyre::Result<SimulationReport> {
        let network = request.network();
        let params = network.profile().local_chain.as_ref().ok_or_else(|| {
            eyre!("Network '{}' has no in-process chain to run the voting round on", network.name())
        })?;
        let pool = request.accounts();
        let proposer = pool.governance_authority().ok_or_else(|| eyre!("Account pool is empty"))?;

        let mut chain = LocalChain::new(params, pool);
        let epochs = EpochClock::new(params.initial_timestamp, self.epoch_duration);
        let start_block = chain.block_number();

        let proposal = chain.call(
            proposer.address(),
            BALLOT_BOX_ADDRESS,
            Bytes::from_static(PROPOSE_CALLDATA),
            PROPOSE_GAS,
        )?;
        let proposal_epoch = epochs.epoch_of(proposal.timestamp);
        info!(
            target: "govsim::simulation",
            proposer = %proposer.address(),
            proposal = %proposal.tx_hash,
            epoch = proposal_epoch,
            "Proposal opened"
        );

        let voters = pool.voter_candidates().iter().take(request.voter_count());
        for (i, voter) in voters.enumerate() {
            let ballot = Ballot { proposal_id: proposal.tx_hash, support: i % 2 == 0 };
            let data = ballot.seal(voter.private_key.signer()).await?;
            let receipt = chain.call(voter.address(), BALLOT_BOX_ADDRESS, data, VOTE_GAS)?;
            debug!(
                target: "govsim::simulation",
                voter = %voter.address(),
                support = ballot.support,
                block = receipt.block_number,
                "Ballot cast"
            );
        }

        // Tally from what the chain recorded, not from what was sent.
        let (mut votes_for, mut votes_against) = (0, 0);
        for block in chain.blocks().iter().skip_while(|b| b.number <= proposal.block_number) {
            for tx in &block.transactions {
                let TxKind::Call { to, data } = &tx.kind else { continue };
                if *to != BALLOT_BOX_ADDRESS {
                    continue;
                }
                let ballot = Ballot::verify(data, tx.from)?;
                ensure!(
                    ballot.proposal_id == proposal.tx_hash,
                    "Ballot from {} targets unknown proposal {}",
                    tx.from,
                    ballot.proposal_id
                );
                let epoch = epochs.epoch_of(block.timestamp);
                ensure!(
                    epoch == proposal_epoch,
                    "Ballot from {} mined in epoch {} but the proposal is in epoch {}",
                    tx.from,
                    epoch,
                    proposal_epoch
                );
                if ballot.support {
                    votes_for += 1;
                } else {
                    votes_against += 1;
                }
            }
        }

        let report = SimulationReport {
            network: network.name().to_string(),
            proposer: proposer.address(),
            proposal_id: proposal.tx_hash,
            proposal_epoch,
            voters: request.voter_count(),
            votes_for,
            votes_against,
            blocks_mined: chain.block_number() - start_block,
            first_block_timestamp: proposal.timestamp,
            last_block_timestamp: chain.timestamp(),
        };
        info!(
            target: "govsim::simulation",
            votes_for,
            votes_against,
            blocks = report.blocks_mined,
            "Voting round complete"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accounts::{max_balance, source::keyed_account, AccountPool, KeySource};
    use crate::config::RpcOverrides;
    use crate::network::{LocalChainParams, NetworkHandle, NetworkRegistry};
    use crate::simulation::{DriverError, SimulationDriver};
    use std::sync::Arc;

    fn pool(with_genesis_governance: bool) -> Arc<AccountPool> {
        let deployer =
            keyed_account(&format!("{:064x}", 999), KeySource::Deployer, max_balance()).unwrap();
        let corpus = (1..=8u64)
            .map(|i| {
                keyed_account(&format!("{i:064x}"), KeySource::Corpus { index: 0 }, max_balance())
                    .unwrap()
            })
            .collect();
        let genesis_governance = with_genesis_governance.then(|| {
            keyed_account(&format!("{:064x}", 777), KeySource::GenesisGovernance, max_balance())
                .unwrap()
        });
        Arc::new(
            AccountPool::assemble(Some(deployer), corpus, 100, genesis_governance, None).unwrap(),
        )
    }

    fn network(pool: &Arc<AccountPool>, name: &str) -> NetworkHandle {
        NetworkRegistry::new(Arc::clone(pool), &RpcOverrides::default())
            .unwrap()
            .resolve(name)
            .unwrap()
    }

    #[test]
    fn test_default_epoch_duration() {
        assert_eq!(VotingRoundSimulation::default().epoch_duration(), 180);
    }

    #[tokio::test]
    async fn test_round_on_hardhat() {
        let pool = pool(false);
        let driver = SimulationDriver::new(VotingRoundSimulation::default());

        let report = driver.run(network(&pool, "hardhat"), Arc::clone(&pool), 4).await.unwrap();

        assert_eq!(report.network, "hardhat");
        assert_eq!(report.proposer, pool.accounts()[0].address());
        assert_eq!(report.voters, 4);
        assert_eq!((report.votes_for, report.votes_against), (2, 2));
        assert_eq!(report.blocks_mined, 5);
        assert_eq!(report.first_block_timestamp, report.last_block_timestamp);
        assert_eq!(report.proposal_epoch, 0);
    }

    #[tokio::test]
    async fn test_genesis_governance_opens_proposal() {
        let pool = pool(true);
        let driver = SimulationDriver::new(VotingRoundSimulation::default());

        let report = driver.run(network(&pool, "hardhat"), Arc::clone(&pool), 3).await.unwrap();

        assert_eq!(report.proposer, pool.genesis_governance().unwrap().address());
        assert_eq!((report.votes_for, report.votes_against), (2, 1));
    }

    #[tokio::test]
    async fn test_round_is_deterministic() {
        let pool = pool(true);
        let driver = SimulationDriver::new(VotingRoundSimulation::default());

        let first = driver.run(network(&pool, "hardhat"), Arc::clone(&pool), 8).await.unwrap();
        let second = driver.run(network(&pool, "hardhat"), Arc::clone(&pool), 8).await.unwrap();

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_remote_network_is_execution_error() {
        let pool = pool(false);
        let driver = SimulationDriver::new(VotingRoundSimulation::default());

        let err = driver.run(network(&pool, "coston2"), Arc::clone(&pool), 2).await.unwrap_err();

        assert!(matches!(&err, DriverError::Execution(_)));
        assert!(err.to_string().contains("coston2"));
    }

    #[tokio::test]
    async fn test_strict_timestamps_cross_epoch_boundary() {
        let pool = pool(false);
        let hardhat = network(&pool, "hardhat");
        let mut profile = hardhat.profile().clone();
        profile.local_chain =
            Some(LocalChainParams::new(31337, "2021-01-01", 125_000_000, false).unwrap());
        let strict = NetworkHandle::new(profile, Arc::clone(&pool));

        // Proposal at +1s, ballots at +2s, +3s: the second ballot leaves the 3s epoch.
        let routine = VotingRoundSimulation::new(NonZeroU64::new(3).unwrap());
        let driver = SimulationDriver::new(routine);

        let err = driver.run(strict, Arc::clone(&pool), 2).await.unwrap_err();
        assert!(err.to_string().contains("epoch"), "unexpected error: {err}");
    }
}

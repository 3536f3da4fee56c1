//! In-process Devnet
//!
//! The chain behind the in-process network profile. It has a deterministic
//! clock and mines every transaction into its own block. Consecutive blocks
//! may optionally share a timestamp.
//!
//! # Timestamp rule
//!
//! ```text
//! next = max(clock, parent)        allow_blocks_with_same_timestamp
//! next = max(clock, parent + 1)    otherwise
//! ```
//!
//! The clock starts at the profile's initial date and only moves through
//! [`LocalChain::increase_time`].

pub mod epoch;
pub mod errors;

pub use epoch::EpochClock;
pub use errors::DevnetError;

use alloy_primitives::{keccak256, Address, Bytes, B256, U256};
use reth_tracing::tracing::debug;
use std::collections::BTreeMap;

use crate::accounts::AccountPool;
use crate::network::LocalChainParams;

/// Gas charged for a plain value transfer
pub const TRANSFER_GAS: u64 = 21_000;

/// What a transaction does
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TxKind {
    /// Move value between accounts
    Transfer {
        /// Recipient
        to: Address,
        /// Amount in wei
        value: U256,
    },
    /// Opaque call recorded for the caller to interpret
    Call {
        /// Target
        to: Address,
        /// Calldata
        data: Bytes,
    },
}

/// A mined transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    /// Transaction hash
    pub hash: B256,
    /// Sender
    pub from: Address,
    /// Sender nonce
    pub nonce: u64,
    /// Gas limit
    pub gas: u64,
    /// Payload
    pub kind: TxKind,
}

/// A mined block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    /// Block number
    pub number: u64,
    /// Block timestamp
    pub timestamp: u64,
    /// Gas used by the block's transactions
    pub gas_used: u64,
    /// Included transactions
    pub transactions: Vec<Transaction>,
}

/// Where a transaction landed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Receipt {
    /// Transaction hash
    pub tx_hash: B256,
    /// Block number
    pub block_number: u64,
    /// Block timestamp
    pub timestamp: u64,
}

/// Automining in-process chain
#[derive(Debug, Clone)]
pub struct LocalChain {
    chain_id: u64,
    block_gas_limit: u64,
    allow_same_timestamp: bool,
    clock: u64,
    balances: BTreeMap<Address, U256>,
    nonces: BTreeMap<Address, u64>,
    blocks: Vec<Block>,
}

impl LocalChain {
    /// Boot a chain from profile params, funding every pool account
    pub fn new(params: &LocalChainParams, pool: &AccountPool) -> Self {
        let balances: BTreeMap<Address, U256> =
            pool.accounts().iter().map(|a| (a.address(), a.balance)).collect();

        let genesis = Block {
            number: 0,
            timestamp: params.initial_timestamp,
            gas_used: 0,
            transactions: Vec::new(),
        };

        debug!(
            target: "govsim::devnet",
            chain_id = params.chain_id,
            timestamp = params.initial_timestamp,
            accounts = balances.len(),
            "Booted in-process chain"
        );

        Self {
            chain_id: params.chain_id,
            block_gas_limit: params.block_gas_limit,
            allow_same_timestamp: params.allow_blocks_with_same_timestamp,
            clock: params.initial_timestamp,
            balances,
            nonces: BTreeMap::new(),
            blocks: vec![genesis],
        }
    }

    /// Chain ID
    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// Latest block
    pub fn latest(&self) -> &Block {
        // The genesis block is inserted on construction and blocks are never removed.
        &self.blocks[self.blocks.len() - 1]
    }

    /// All blocks, genesis first
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Latest block number
    pub fn block_number(&self) -> u64 {
        self.latest().number
    }

    /// Latest block timestamp
    pub fn timestamp(&self) -> u64 {
        self.latest().timestamp
    }

    /// Current clock value
    pub fn clock(&self) -> u64 {
        self.clock
    }

    /// Advance the clock
    pub fn increase_time(&mut self, secs: u64) {
        self.clock = self.clock.saturating_add(secs);
    }

    /// Balance of `address` (zero if unknown)
    pub fn balance_of(&self, address: &Address) -> U256 {
        self.balances.get(address).copied().unwrap_or_default()
    }

    /// Next nonce of `address`
    pub fn nonce_of(&self, address: &Address) -> u64 {
        self.nonces.get(address).copied().unwrap_or_default()
    }

    /// Timestamp the next mined block will carry
    pub fn next_timestamp(&self) -> u64 {
        let parent = self.timestamp();
        let floor = if self.allow_same_timestamp { parent } else { parent.saturating_add(1) };
        self.clock.max(floor)
    }

    /// Transfer value, mined into its own block
    pub fn transfer(
        &mut self,
        from: Address,
        to: Address,
        value: U256,
    ) -> Result<Receipt, DevnetError> {
        self.submit(from, TRANSFER_GAS, TxKind::Transfer { to, value })
    }

    /// Record an opaque call, mined into its own block
    pub fn call(
        &mut self,
        from: Address,
        to: Address,
        data: Bytes,
        gas: u64,
    ) -> Result<Receipt, DevnetError> {
        self.submit(from, gas, TxKind::Call { to, data })
    }

    /// Validate, apply and mine one transaction
    pub fn submit(&mut self, from: Address, gas: u64, kind: TxKind) -> Result<Receipt, DevnetError> {
        if gas > self.block_gas_limit {
            return Err(DevnetError::GasLimitExceeded { gas, limit: self.block_gas_limit });
        }
        let balance =
            self.balances.get(&from).copied().ok_or(DevnetError::UnknownAccount(from))?;

        if let TxKind::Transfer { to, value } = &kind {
            if balance < *value {
                return Err(DevnetError::InsufficientBalance { from, balance, value: *value });
            }
            self.balances.insert(from, balance - *value);
            let credited = self.balance_of(to).saturating_add(*value);
            self.balances.insert(*to, credited);
        }

        let nonce = self.nonce_of(&from);
        self.nonces.insert(from, nonce + 1);

        let hash = self.tx_hash(&from, nonce, &kind);
        let block = Block {
            number: self.block_number() + 1,
            timestamp: self.next_timestamp(),
            gas_used: gas,
            transactions: vec![Transaction { hash, from, nonce, gas, kind }],
        };
        let receipt =
            Receipt { tx_hash: hash, block_number: block.number, timestamp: block.timestamp };

        debug!(
            target: "govsim::devnet",
            number = block.number,
            timestamp = block.timestamp,
            %from,
            "Mined block"
        );
        self.blocks.push(block);
        Ok(receipt)
    }

    fn tx_hash(&self, from: &Address, nonce: u64, kind: &TxKind) -> B256 {
        let mut preimage = Vec::with_capacity(128);
        preimage.extend_from_slice(&self.chain_id.to_be_bytes());
        preimage.extend_from_slice(from.as_slice());
        preimage.extend_from_slice(&nonce.to_be_bytes());
        match kind {
            TxKind::Transfer { to, value } => {
                preimage.push(0);
                preimage.extend_from_slice(to.as_slice());
                preimage.extend_from_slice(&value.to_be_bytes::<32>());
            }
            TxKind::Call { to, data } => {
                preimage.push(1);
                preimage.extend_from_slice(to.as_slice());
                preimage.extend_from_slice(data);
            }
        }
        keccak256(preimage)
    }
}

use alloy_primitives::{Address, U256};
use thiserror::Error;

/// Transaction rejections of the in-process chain
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DevnetError {
    /// Transaction gas exceeds the block gas ceiling
    #[error("Transaction gas {gas} exceeds block gas limit {limit}")]
    GasLimitExceeded {
        /// Requested gas
        gas: u64,
        /// Block gas ceiling
        limit: u64,
    },

    /// Sender cannot cover the transferred value
    #[error("Account {from} has balance {balance}, cannot transfer {value}")]
    InsufficientBalance {
        /// Sender
        from: Address,
        /// Sender balance
        balance: U256,
        /// Requested value
        value: U256,
    },

    /// Sender was not funded at genesis
    #[error("Unknown sender {0}")]
    UnknownAccount(Address),
}

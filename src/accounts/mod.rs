//! Account Pool
//!
//! Normalizes the account sources (deployer key, account corpus, governance
//! keys) and merges them into one ordered, deduplicated, funded pool:
//! - [`source`]: raw input → [`Account`]
//! - [`pool`]: precedence-ordered merge → [`AccountPool`]

pub mod key;
pub mod pool;
pub mod source;

pub use key::{KeyParseError, PrivateKey};
pub use pool::{AccountPool, PoolLayout, Role};
pub use source::{max_balance, KeySource};

use alloy_primitives::{Address, U256};
use serde::{Serialize, Serializer};

/// A funded signing identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// Signing key
    pub private_key: PrivateKey,
    /// Initial balance in wei
    #[serde(serialize_with = "serialize_decimal")]
    pub balance: U256,
}

impl Account {
    /// Address controlled by this account
    pub fn address(&self) -> Address {
        self.private_key.address()
    }
}

fn serialize_decimal<S: Serializer>(value: &U256, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}

//! Normalization of raw account sources into [`Account`] records.

use alloy_primitives::U256;
use reth_tracing::tracing::debug;
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use super::{Account, PrivateKey};
use crate::errors::ConfigError;

/// Balance given to keyed accounts and to corpus records without one (10^32 wei)
pub fn max_balance() -> U256 {
    U256::from(10u64).pow(U256::from(32u64))
}

/// Where an account entered the pool from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeySource {
    /// `DEPLOYER_PRIVATE_KEY`
    Deployer,
    /// `GENESIS_GOVERNANCE_PRIVATE_KEY`
    GenesisGovernance,
    /// `GOVERNANCE_PRIVATE_KEY`
    Governance,
    /// Element of the account corpus file
    Corpus {
        /// Position in the file
        index: usize,
    },
}

impl fmt::Display for KeySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Deployer => f.write_str("deployer key"),
            Self::GenesisGovernance => f.write_str("genesis governance key"),
            Self::Governance => f.write_str("governance key"),
            Self::Corpus { index } => write!(f, "corpus record #{index}"),
        }
    }
}

/// One element of the corpus file
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CorpusRecord {
    private_key: String,
    #[serde(default)]
    balance: Option<BalanceValue>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum BalanceValue {
    Text(String),
    Number(u64),
}

/// Parse a decimal or `0x`-prefixed hex balance.
pub fn parse_balance(raw: &str) -> Option<U256> {
    U256::from_str(raw.trim()).ok()
}

/// Normalize a required key string.
pub fn keyed_account(raw: &str, origin: KeySource, balance: U256) -> Result<Account, ConfigError> {
    let private_key = PrivateKey::parse(raw)
        .map_err(|reason| ConfigError::InvalidPrivateKey { origin, reason })?;
    Ok(Account { private_key, balance })
}

/// Normalize an optional key. Unset, empty and whitespace-only values yield `None`.
pub fn optional_account(
    raw: Option<&str>,
    origin: KeySource,
    balance: U256,
) -> Result<Option<Account>, ConfigError> {
    match raw.map(str::trim).filter(|value| !value.is_empty()) {
        Some(value) => keyed_account(value, origin, balance).map(Some),
        None => Ok(None),
    }
}

/// Read and normalize the account corpus.
///
/// A missing file, malformed JSON, or any invalid record rejects the whole load.
pub fn load_corpus(path: &Path, default_balance: U256) -> Result<Vec<Account>, ConfigError> {
    let data = fs::read_to_string(path)
        .map_err(|source| ConfigError::CorpusRead { path: path.to_path_buf(), source })?;
    let accounts = parse_corpus(&data, path, default_balance)?;
    debug!(target: "govsim::accounts", path = %path.display(), records = accounts.len(), "Loaded account corpus");
    Ok(accounts)
}

/// Normalize corpus JSON already in memory. `path` is only used for error reporting.
pub fn parse_corpus(
    data: &str,
    path: &Path,
    default_balance: U256,
) -> Result<Vec<Account>, ConfigError> {
    let elements: Vec<serde_json::Value> = serde_json::from_str(data)
        .map_err(|source| ConfigError::CorpusParse { path: path.to_path_buf(), source })?;

    elements
        .into_iter()
        .enumerate()
        .map(|(index, element)| normalize_record(index, element, default_balance))
        .collect()
}

fn normalize_record(
    index: usize,
    element: serde_json::Value,
    default_balance: U256,
) -> Result<Account, ConfigError> {
    let origin = KeySource::Corpus { index };
    let record: CorpusRecord = serde_json::from_value(element)
        .map_err(|e| ConfigError::InvalidRecord { index, reason: e.to_string() })?;

    let balance = match record.balance {
        None => default_balance,
        Some(BalanceValue::Number(n)) => U256::from(n),
        Some(BalanceValue::Text(text)) => parse_balance(&text)
            .ok_or(ConfigError::InvalidBalance { origin, value: text })?,
    };

    keyed_account(&record.private_key, origin, balance)
}

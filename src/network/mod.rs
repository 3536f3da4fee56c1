//! Network Profile Registry
//!
//! A fixed table of named targets. Every profile takes its signers from the one
//! shared [`AccountPool`]; nothing here keeps a private copy of the keys.

pub mod genesis;

pub use genesis::{genesis_to_json, local_genesis, write_genesis_file};

use chrono::NaiveDate;
use serde::Serialize;
use std::sync::Arc;

use crate::accounts::{Account, AccountPool, PrivateKey};
use crate::config::RpcOverrides;
use crate::constants::{
    LOCAL_BLOCK_GAS_LIMIT, LOCAL_CHAIN_ID, LOCAL_INITIAL_DATE, REMOTE_RPC_TIMEOUT_MS,
};
use crate::errors::ConfigError;

/// Avalanche-style C-chain endpoint of a locally running node
const LOCAL_C_CHAIN_RPC: &str = "http://127.0.0.1:9650/ext/bc/C/rpc";

/// How a profile obtains its signers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SignerMode {
    /// The pool's private keys, in pool order
    PrivateKeys,
    /// The pool's full `{privateKey, balance}` table (in-process chain)
    Accounts,
    /// The node manages its own accounts
    NodeManaged,
}

/// Chain behavior of the in-process network
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalChainParams {
    /// Chain ID
    pub chain_id: u64,
    /// Start date (`YYYY-MM-DD`, midnight UTC)
    pub initial_date: String,
    /// Unix timestamp of `initial_date`
    pub initial_timestamp: u64,
    /// Block gas ceiling
    pub block_gas_limit: u64,
    /// Whether consecutive blocks may share a timestamp
    pub allow_blocks_with_same_timestamp: bool,
}

impl LocalChainParams {
    /// Build params, resolving `initial_date` to a timestamp
    pub fn new(
        chain_id: u64,
        initial_date: &str,
        block_gas_limit: u64,
        allow_blocks_with_same_timestamp: bool,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            chain_id,
            initial_date: initial_date.to_string(),
            initial_timestamp: date_to_timestamp(initial_date)?,
            block_gas_limit,
            allow_blocks_with_same_timestamp,
        })
    }
}

/// Parse `YYYY-MM-DD` as midnight UTC
pub fn date_to_timestamp(date: &str) -> Result<u64, ConfigError> {
    let parsed = NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|source| ConfigError::InvalidDate { value: date.to_string(), source })?;
    let timestamp = parsed.and_time(chrono::NaiveTime::MIN).and_utc().timestamp();
    u64::try_from(timestamp).map_err(|_| ConfigError::DateBeforeEpoch(date.to_string()))
}

/// A named connection target
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkProfile {
    /// Profile name
    pub name: &'static str,
    /// RPC endpoint (`None` for the in-process chain)
    pub endpoint: Option<String>,
    /// RPC timeout in milliseconds, if the profile sets one
    pub timeout_ms: Option<u64>,
    /// Where signers come from
    pub signer_mode: SignerMode,
    /// Chain ID, if pinned
    pub chain_id: Option<u64>,
    /// In-process chain behavior
    pub local_chain: Option<LocalChainParams>,
}

impl NetworkProfile {
    /// Remote profile with an optional endpoint override
    fn remote(name: &'static str, endpoint_override: Option<&str>, fallback: &str) -> Self {
        let endpoint = endpoint_override
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .unwrap_or(fallback);
        Self {
            name,
            endpoint: Some(endpoint.to_string()),
            timeout_ms: Some(REMOTE_RPC_TIMEOUT_MS),
            signer_mode: SignerMode::PrivateKeys,
            chain_id: None,
            local_chain: None,
        }
    }

    /// Whether this profile runs an in-process chain
    pub fn is_in_process(&self) -> bool {
        self.local_chain.is_some()
    }
}

/// Signers of a resolved profile, borrowed from the shared pool
#[derive(Debug, Clone)]
pub enum Signers<'a> {
    /// Private keys in pool order
    PrivateKeys(Vec<&'a PrivateKey>),
    /// Full account table
    Accounts(&'a [Account]),
    /// Node-managed, nothing injected
    NodeManaged,
}

impl Signers<'_> {
    /// Number of injected signers
    pub fn len(&self) -> usize {
        match self {
            Self::PrivateKeys(keys) => keys.len(),
            Self::Accounts(accounts) => accounts.len(),
            Self::NodeManaged => 0,
        }
    }

    /// Whether no signers are injected
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A profile bound to the shared account pool
#[derive(Debug, Clone)]
pub struct NetworkHandle {
    profile: NetworkProfile,
    pool: Arc<AccountPool>,
}

impl NetworkHandle {
    /// Bind a profile to a pool
    pub fn new(profile: NetworkProfile, pool: Arc<AccountPool>) -> Self {
        Self { profile, pool }
    }

    /// Profile name
    pub fn name(&self) -> &'static str {
        self.profile.name
    }

    /// Underlying profile
    pub fn profile(&self) -> &NetworkProfile {
        &self.profile
    }

    /// Shared account pool
    pub fn pool(&self) -> &Arc<AccountPool> {
        &self.pool
    }

    /// Signers, computed from the pool on each call
    pub fn signers(&self) -> Signers<'_> {
        match self.profile.signer_mode {
            SignerMode::PrivateKeys => Signers::PrivateKeys(self.pool.private_keys().collect()),
            SignerMode::Accounts => Signers::Accounts(self.pool.accounts()),
            SignerMode::NodeManaged => Signers::NodeManaged,
        }
    }
}

/// The fixed set of network profiles
#[derive(Debug, Clone)]
pub struct NetworkRegistry {
    profiles: Vec<NetworkProfile>,
    pool: Arc<AccountPool>,
}

impl NetworkRegistry {
    /// Build the profile table on top of the shared pool
    pub fn new(pool: Arc<AccountPool>, overrides: &RpcOverrides) -> Result<Self, ConfigError> {
        let profiles = vec![
            NetworkProfile::remote("scdev", None, LOCAL_C_CHAIN_RPC),
            NetworkProfile::remote("staging", overrides.staging.as_deref(), LOCAL_C_CHAIN_RPC),
            NetworkProfile::remote(
                "songbird",
                overrides.songbird.as_deref(),
                "https://songbird-api.flare.network/ext/C/rpc",
            ),
            NetworkProfile::remote(
                "flare",
                overrides.flare.as_deref(),
                "https://flare-api.flare.network/ext/C/rpc",
            ),
            NetworkProfile::remote(
                "coston",
                overrides.coston.as_deref(),
                "https://coston-api.flare.network/ext/C/rpc",
            ),
            NetworkProfile::remote(
                "coston2",
                overrides.coston2.as_deref(),
                "https://coston2-api.flare.network/ext/C/rpc",
            ),
            NetworkProfile {
                name: "hardhat",
                endpoint: None,
                timeout_ms: None,
                signer_mode: SignerMode::Accounts,
                chain_id: Some(LOCAL_CHAIN_ID),
                // Several state changes must land inside one voting epoch, so blocks
                // may share a timestamp here. No other profile relaxes this.
                local_chain: Some(LocalChainParams::new(
                    LOCAL_CHAIN_ID,
                    LOCAL_INITIAL_DATE,
                    LOCAL_BLOCK_GAS_LIMIT,
                    true,
                )?),
            },
            NetworkProfile {
                name: "local",
                endpoint: Some("http://127.0.0.1:8545".to_string()),
                timeout_ms: None,
                signer_mode: SignerMode::NodeManaged,
                chain_id: Some(LOCAL_CHAIN_ID),
                local_chain: None,
            },
        ];

        Ok(Self { profiles, pool })
    }

    /// All profiles in table order
    pub fn profiles(&self) -> &[NetworkProfile] {
        &self.profiles
    }

    /// Profile names in table order
    pub fn names(&self) -> Vec<&'static str> {
        self.profiles.iter().map(|p| p.name).collect()
    }

    /// Look up a profile by name and bind it to the pool
    pub fn resolve(&self, name: &str) -> Result<NetworkHandle, ConfigError> {
        let profile = self.profiles.iter().find(|p| p.name == name).ok_or_else(|| {
            ConfigError::UnknownNetwork { name: name.to_string(), available: self.names().join(", ") }
        })?;

        Ok(NetworkHandle { profile: profile.clone(), pool: Arc::clone(&self.pool) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accounts::{source::keyed_account, max_balance, KeySource};

    fn pool(n: u64) -> Arc<AccountPool> {
        let corpus = (1..=n)
            .map(|i| {
                keyed_account(&format!("{i:064x}"), KeySource::Corpus { index: 0 }, max_balance())
                    .unwrap()
            })
            .collect();
        Arc::new(AccountPool::assemble(None, corpus, 100, None, None).unwrap())
    }

    fn registry(overrides: &RpcOverrides) -> NetworkRegistry {
        NetworkRegistry::new(pool(3), overrides).unwrap()
    }

    #[test]
    fn test_profile_names() {
        let registry = registry(&RpcOverrides::default());
        assert_eq!(
            registry.names(),
            vec!["scdev", "staging", "songbird", "flare", "coston", "coston2", "hardhat", "local"]
        );
    }

    #[test]
    fn test_remote_fallback_endpoints() {
        let registry = registry(&RpcOverrides::default());
        let flare = registry.resolve("flare").unwrap();
        assert_eq!(
            flare.profile().endpoint.as_deref(),
            Some("https://flare-api.flare.network/ext/C/rpc")
        );
        assert_eq!(flare.profile().timeout_ms, Some(40_000));
        let staging = registry.resolve("staging").unwrap();
        assert_eq!(staging.profile().endpoint.as_deref(), Some(LOCAL_C_CHAIN_RPC));
    }

    #[test]
    fn test_remote_override_and_empty_override() {
        let overrides = RpcOverrides {
            coston: Some("https://coston.example/rpc".into()),
            coston2: Some("".into()),
            ..Default::default()
        };
        let registry = registry(&overrides);
        assert_eq!(
            registry.resolve("coston").unwrap().profile().endpoint.as_deref(),
            Some("https://coston.example/rpc")
        );
        assert_eq!(
            registry.resolve("coston2").unwrap().profile().endpoint.as_deref(),
            Some("https://coston2-api.flare.network/ext/C/rpc")
        );
    }

    #[test]
    fn test_signers_follow_shared_pool() {
        let registry = registry(&RpcOverrides::default());

        let songbird = registry.resolve("songbird").unwrap();
        match songbird.signers() {
            Signers::PrivateKeys(keys) => {
                let expected: Vec<_> = songbird.pool().private_keys().collect();
                assert_eq!(keys, expected);
            }
            other => panic!("Expected private keys, got {:?}", other),
        }

        let hardhat = registry.resolve("hardhat").unwrap();
        assert!(matches!(hardhat.signers(), Signers::Accounts(a) if a.len() == 3));

        let local = registry.resolve("local").unwrap();
        assert!(local.signers().is_empty());
    }

    #[test]
    fn test_only_hardhat_is_in_process() {
        let registry = registry(&RpcOverrides::default());
        let in_process: Vec<_> =
            registry.profiles().iter().filter(|p| p.is_in_process()).map(|p| p.name).collect();
        assert_eq!(in_process, vec!["hardhat"]);
    }

    #[test]
    fn test_hardhat_chain_params() {
        let registry = registry(&RpcOverrides::default());
        let hardhat = registry.resolve("hardhat").unwrap();
        let params = hardhat.profile().local_chain.as_ref().unwrap();

        assert_eq!(params.initial_timestamp, 1_609_459_200); // 2021-01-01T00:00:00Z
        assert_eq!(params.block_gas_limit, 125_000_000);
        assert!(params.allow_blocks_with_same_timestamp);
        assert_eq!(params.chain_id, 31337);
    }

    #[test]
    fn test_unknown_network() {
        let registry = registry(&RpcOverrides::default());
        let err = registry.resolve("mainnet").unwrap_err();
        match err {
            ConfigError::UnknownNetwork { name, available } => {
                assert_eq!(name, "mainnet");
                assert!(available.contains("hardhat"));
            }
            other => panic!("Expected UnknownNetwork, got {:?}", other),
        }
    }

    #[test]
    fn test_date_before_unix_epoch_rejected() {
        match date_to_timestamp("1969-12-31") {
            Err(ConfigError::DateBeforeEpoch(date)) => assert_eq!(date, "1969-12-31"),
            other => panic!("Expected DateBeforeEpoch, got {:?}", other),
        }
        assert_eq!(date_to_timestamp("1970-01-01").unwrap(), 0);
        assert!(LocalChainParams::new(31337, "1900-01-01", 125_000_000, true).is_err());
    }

    #[test]
    fn test_invalid_date() {
        assert!(matches!(
            date_to_timestamp("2021-13-01"),
            Err(ConfigError::InvalidDate { .. })
        ));
    }
}

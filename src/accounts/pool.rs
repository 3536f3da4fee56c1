use alloy_primitives::Address;
use reth_tracing::tracing::{debug, info};
use serde::{Serialize, Serializer};
use std::collections::HashMap;
use std::ops::Range;
use std::path::Path;

use super::source::{load_corpus, max_balance, optional_account, KeySource};
use super::{Account, PrivateKey};
use crate::config::KeySources;
use crate::errors::ConfigError;

/// Role an account plays inside the pool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Index 0: the deployer key, or the first corpus account when none was supplied
    Deployer,
    /// Member of the corpus slice
    Corpus,
    /// Genesis governance key
    GenesisGovernance,
    /// Governance key
    Governance,
}

/// Index layout of the sources inside an [`AccountPool`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolLayout {
    /// Deployer position (always 0 when present)
    pub deployer: Option<usize>,
    /// Positions of the corpus slice
    pub corpus: Range<usize>,
    /// Genesis governance position
    pub genesis_governance: Option<usize>,
    /// Governance position
    pub governance: Option<usize>,
}

/// Ordered, deduplicated, funded account set.
///
/// Built once per invocation and shared read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountPool {
    accounts: Vec<Account>,
    layout: PoolLayout,
}

/// Accumulates accounts while rejecting repeated keys
#[derive(Default)]
struct Merge {
    accounts: Vec<Account>,
    seen: HashMap<Address, KeySource>,
}

impl Merge {
    fn push(&mut self, account: Account, origin: KeySource) -> Result<usize, ConfigError> {
        let address = account.address();
        if let Some(first) = self.seen.insert(address, origin) {
            return Err(ConfigError::DuplicateAccount { address, first, second: origin });
        }
        self.accounts.push(account);
        Ok(self.accounts.len() - 1)
    }
}

impl AccountPool {
    /// Read the corpus and merge it with the keyed sources.
    pub fn build(
        keys: &KeySources,
        corpus_path: &Path,
        corpus_limit: usize,
    ) -> Result<Self, ConfigError> {
        let balance = max_balance();
        let deployer =
            optional_account(keys.deployer.as_deref(), KeySource::Deployer, balance)?;
        let genesis_governance = optional_account(
            keys.genesis_governance.as_deref(),
            KeySource::GenesisGovernance,
            balance,
        )?;
        let governance =
            optional_account(keys.governance.as_deref(), KeySource::Governance, balance)?;

        let corpus = load_corpus(corpus_path, balance)?;
        let pool = Self::assemble(deployer, corpus, corpus_limit, genesis_governance, governance)?;

        info!(
            target: "govsim::accounts",
            accounts = pool.len(),
            corpus = pool.layout.corpus.len(),
            deployer = pool.layout.deployer.is_some(),
            "Account pool built"
        );
        Ok(pool)
    }

    /// Merge already-normalized sources.
    ///
    /// Order: deployer, the first `corpus_limit` corpus entries minus the deployer
    /// key, genesis governance, governance. Any other repeated key is an error.
    pub fn assemble(
        deployer: Option<Account>,
        corpus: Vec<Account>,
        corpus_limit: usize,
        genesis_governance: Option<Account>,
        governance: Option<Account>,
    ) -> Result<Self, ConfigError> {
        let mut merge = Merge::default();

        let deployer_key = deployer.as_ref().map(|a| a.private_key.clone());
        let deployer = deployer.map(|a| merge.push(a, KeySource::Deployer)).transpose()?;

        let corpus_start = merge.accounts.len();
        for (index, account) in corpus.into_iter().enumerate().take(corpus_limit) {
            if deployer_key.as_ref() == Some(&account.private_key) {
                debug!(target: "govsim::accounts", index, "Skipping corpus record holding the deployer key");
                continue;
            }
            merge.push(account, KeySource::Corpus { index })?;
        }
        let corpus = corpus_start..merge.accounts.len();

        let genesis_governance = genesis_governance
            .map(|a| merge.push(a, KeySource::GenesisGovernance))
            .transpose()?;
        let governance =
            governance.map(|a| merge.push(a, KeySource::Governance)).transpose()?;

        Ok(Self {
            accounts: merge.accounts,
            layout: PoolLayout { deployer, corpus, genesis_governance, governance },
        })
    }

    /// All accounts in pool order
    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    /// Index layout of the sources
    pub fn layout(&self) -> &PoolLayout {
        &self.layout
    }

    /// Number of accounts
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    /// Whether the pool holds no accounts
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Account at `index`
    pub fn get(&self, index: usize) -> Option<&Account> {
        self.accounts.get(index)
    }

    /// Signing keys in pool order
    pub fn private_keys(&self) -> impl Iterator<Item = &PrivateKey> + '_ {
        self.accounts.iter().map(|a| &a.private_key)
    }

    /// Addresses in pool order
    pub fn addresses(&self) -> impl Iterator<Item = Address> + '_ {
        self.accounts.iter().map(Account::address)
    }

    /// The conventional default identity at index 0
    pub fn deployer(&self) -> Option<&Account> {
        self.accounts.first()
    }

    /// Genesis governance account if supplied
    pub fn genesis_governance(&self) -> Option<&Account> {
        self.layout.genesis_governance.and_then(|i| self.accounts.get(i))
    }

    /// Governance account if supplied
    pub fn governance(&self) -> Option<&Account> {
        self.layout.governance.and_then(|i| self.accounts.get(i))
    }

    /// Identity that opens proposals: genesis governance if present, else index 0.
    pub fn governance_authority(&self) -> Option<&Account> {
        self.genesis_governance().or_else(|| self.deployer())
    }

    /// Accounts eligible for the voting role.
    ///
    /// The corpus slice, minus index 0 when no deployer key was supplied and the
    /// first corpus account therefore acts as deployer.
    pub fn voter_candidates(&self) -> &[Account] {
        let mut range = self.layout.corpus.clone();
        if self.layout.deployer.is_none() && self.acting_deployer() == Some(range.start) {
            range.start += 1;
        }
        &self.accounts[range]
    }

    /// Index holding the deployer role: the deployer key, else the first corpus account
    fn acting_deployer(&self) -> Option<usize> {
        let corpus = &self.layout.corpus;
        self.layout
            .deployer
            .or_else(|| (corpus.start == 0 && !corpus.is_empty()).then_some(0))
    }

    /// Number of accounts eligible for the voting role
    pub fn eligible_voters(&self) -> usize {
        self.voter_candidates().len()
    }

    /// Role of the account at `index`
    pub fn role_of(&self, index: usize) -> Option<Role> {
        if index >= self.accounts.len() {
            return None;
        }
        if self.acting_deployer() == Some(index) {
            Some(Role::Deployer)
        } else if self.layout.genesis_governance == Some(index) {
            Some(Role::GenesisGovernance)
        } else if self.layout.governance == Some(index) {
            Some(Role::Governance)
        } else {
            Some(Role::Corpus)
        }
    }
}

impl Serialize for AccountPool {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.accounts.serialize(serializer)
    }
}

//! Genesis export for the in-process network.
//!
//! Renders the in-process profile and the account pool as a standard genesis
//! document so an external dev node can boot with the same initial state.

use alloy_genesis::{Genesis, GenesisAccount};
use std::collections::BTreeMap;
use std::path::Path;

use super::NetworkHandle;
use crate::errors::ConfigError;

/// Initial EIP-1559 base fee (1 gwei)
const INITIAL_BASE_FEE: u64 = 1_000_000_000;

/// Build the genesis of an in-process profile, funding every pool account.
pub fn local_genesis(network: &NetworkHandle) -> Result<Genesis, ConfigError> {
    let params = network
        .profile()
        .local_chain
        .as_ref()
        .ok_or_else(|| ConfigError::NotInProcess(network.name().to_string()))?;

    let mut alloc = BTreeMap::new();
    for account in network.pool().accounts() {
        alloc.insert(
            account.address(),
            GenesisAccount { balance: account.balance, ..Default::default() },
        );
    }

    let chain_config = serde_json::json!({
        "chainId": params.chain_id,
        "homesteadBlock": 0,
        "eip150Block": 0,
        "eip155Block": 0,
        "eip158Block": 0,
        "byzantiumBlock": 0,
        "constantinopleBlock": 0,
        "petersburgBlock": 0,
        "istanbulBlock": 0,
        "berlinBlock": 0,
        "londonBlock": 0,
        "terminalTotalDifficulty": 0,
        "terminalTotalDifficultyPassed": true,
        "shanghaiTime": 0,
    });

    let mut genesis = Genesis::default();
    genesis.config = serde_json::from_value(chain_config).map_err(ConfigError::SerializeGenesis)?;
    genesis.timestamp = params.initial_timestamp;
    genesis.gas_limit = params.block_gas_limit;
    genesis.base_fee_per_gas = Some(u128::from(INITIAL_BASE_FEE));
    genesis.alloc = alloc;
    Ok(genesis)
}

/// Serialize a genesis to pretty JSON
pub fn genesis_to_json(genesis: &Genesis) -> Result<String, ConfigError> {
    serde_json::to_string_pretty(genesis).map_err(ConfigError::SerializeGenesis)
}

/// Write a genesis file to disk
pub fn write_genesis_file(genesis: &Genesis, path: &Path) -> Result<(), ConfigError> {
    let json = genesis_to_json(genesis)?;
    std::fs::write(path, json)
        .map_err(|source| ConfigError::WriteGenesis { path: path.to_path_buf(), source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accounts::{max_balance, source::keyed_account, AccountPool, KeySource};
    use crate::config::RpcOverrides;
    use crate::network::NetworkRegistry;
    use alloy_primitives::U256;
    use std::sync::Arc;

    fn registry() -> NetworkRegistry {
        let deployer =
            keyed_account(&format!("{:064x}", 99), KeySource::Deployer, max_balance()).unwrap();
        let corpus = (1..=4u64)
            .map(|i| {
                keyed_account(&format!("{i:064x}"), KeySource::Corpus { index: 0 }, U256::from(i))
                    .unwrap()
            })
            .collect();
        let pool = AccountPool::assemble(Some(deployer), corpus, 10, None, None).unwrap();
        NetworkRegistry::new(Arc::new(pool), &RpcOverrides::default()).unwrap()
    }

    #[test]
    fn test_genesis_funds_every_pool_account() {
        let hardhat = registry().resolve("hardhat").unwrap();
        let genesis = local_genesis(&hardhat).unwrap();

        assert_eq!(genesis.alloc.len(), hardhat.pool().len());
        for account in hardhat.pool().accounts() {
            assert_eq!(genesis.alloc[&account.address()].balance, account.balance);
        }
    }

    #[test]
    fn test_genesis_chain_parameters() {
        let hardhat = registry().resolve("hardhat").unwrap();
        let genesis = local_genesis(&hardhat).unwrap();

        assert_eq!(genesis.config.chain_id, 31337);
        assert_eq!(genesis.timestamp, 1_609_459_200);
        assert_eq!(genesis.gas_limit, 125_000_000);
        assert_eq!(genesis.base_fee_per_gas, Some(1_000_000_000));
    }

    #[test]
    fn test_remote_profile_has_no_local_genesis() {
        let flare = registry().resolve("flare").unwrap();
        assert!(matches!(local_genesis(&flare), Err(ConfigError::NotInProcess(name)) if name == "flare"));
    }

    #[test]
    fn test_genesis_file_roundtrip() {
        let hardhat = registry().resolve("hardhat").unwrap();
        let genesis = local_genesis(&hardhat).unwrap();
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("genesis.json");

        write_genesis_file(&genesis, &path).unwrap();

        let parsed: Genesis =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed.alloc.len(), genesis.alloc.len());
        assert_eq!(parsed.timestamp, genesis.timestamp);
    }
}

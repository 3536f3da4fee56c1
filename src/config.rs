//! Immutable process configuration.
//!
//! [`Settings`] is assembled once from CLI flags and their environment
//! fallbacks. [`Context`] turns it into the shared account pool and network
//! registry. Nothing reads the environment after `main` builds the context.

use reth_tracing::tracing::warn;
use serde::{Serialize, Serializer};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use crate::accounts::AccountPool;
use crate::cli::Cli;
use crate::constants::{DEFAULT_NETWORK, LOCAL_CORPUS_LIMIT, REMOTE_FORK_CORPUS_LIMIT};
use crate::errors::ConfigError;
use crate::network::NetworkRegistry;

/// Raw keyed account sources. Unset or empty values mean "absent".
#[derive(Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeySources {
    /// `DEPLOYER_PRIVATE_KEY`
    #[serde(serialize_with = "redact")]
    pub deployer: Option<String>,
    /// `GENESIS_GOVERNANCE_PRIVATE_KEY`
    #[serde(serialize_with = "redact")]
    pub genesis_governance: Option<String>,
    /// `GOVERNANCE_PRIVATE_KEY`
    #[serde(serialize_with = "redact")]
    pub governance: Option<String>,
}

fn is_set(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}

fn redact<S: Serializer>(value: &Option<String>, serializer: S) -> Result<S::Ok, S::Error> {
    if is_set(value) {
        serializer.serialize_str("<redacted>")
    } else {
        serializer.serialize_none()
    }
}

impl fmt::Debug for KeySources {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeySources")
            .field("deployer", &is_set(&self.deployer))
            .field("genesis_governance", &is_set(&self.genesis_governance))
            .field("governance", &is_set(&self.governance))
            .finish()
    }
}

/// Where the simulation is executed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExecutionMode {
    /// Local in-process execution
    Local,
    /// Remote forked execution (`TENDERLY=true`), resource constrained
    RemoteFork,
}

impl ExecutionMode {
    /// Only the exact value `true` selects the remote-fork mode.
    pub fn from_flag(flag: Option<&str>) -> Self {
        if flag == Some("true") {
            Self::RemoteFork
        } else {
            Self::Local
        }
    }

    /// Number of corpus accounts taken in this mode
    pub fn corpus_limit(self) -> usize {
        match self {
            Self::Local => LOCAL_CORPUS_LIMIT,
            Self::RemoteFork => REMOTE_FORK_CORPUS_LIMIT,
        }
    }
}

/// Per-network RPC endpoint overrides
#[derive(Debug, Clone, Default, Serialize)]
pub struct RpcOverrides {
    /// `STAGING_RPC`
    pub staging: Option<String>,
    /// `SONGBIRD_RPC`
    pub songbird: Option<String>,
    /// `FLARE_RPC`
    pub flare: Option<String>,
    /// `COSTON_RPC`
    pub coston: Option<String>,
    /// `COSTON2_RPC`
    pub coston2: Option<String>,
}

/// Project directory layout
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectPaths {
    /// Contract sources
    pub sources: PathBuf,
    /// Test directory (`TEST_PATH` override)
    pub tests: PathBuf,
    /// Build cache
    pub cache: PathBuf,
    /// Compiled artifacts
    pub artifacts: PathBuf,
}

impl ProjectPaths {
    /// Default layout with an optional test directory override
    pub fn new(test_path: Option<&str>) -> Self {
        let tests = test_path.map(str::trim).filter(|p| !p.is_empty()).unwrap_or("test");
        Self {
            sources: PathBuf::from("./contracts/"),
            tests: PathBuf::from(tests),
            cache: PathBuf::from("./cache"),
            artifacts: PathBuf::from("./artifacts"),
        }
    }
}

impl Default for ProjectPaths {
    fn default() -> Self {
        Self::new(None)
    }
}

/// Resolved process settings
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Keyed account sources
    pub keys: KeySources,
    /// Account corpus location
    pub corpus_path: PathBuf,
    /// Local or remote-fork execution
    pub execution_mode: ExecutionMode,
    /// RPC endpoint overrides
    pub rpc_overrides: RpcOverrides,
    /// Project directories
    pub paths: ProjectPaths,
    /// Network used when none is named
    pub default_network: String,
}

impl Settings {
    /// Collect settings from parsed CLI arguments (which already carry env fallbacks)
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            keys: KeySources {
                deployer: cli.deployer_key.clone(),
                genesis_governance: cli.genesis_governance_key.clone(),
                governance: cli.governance_key.clone(),
            },
            corpus_path: cli.corpus.clone(),
            execution_mode: ExecutionMode::from_flag(cli.tenderly.as_deref()),
            rpc_overrides: RpcOverrides {
                staging: cli.staging_rpc.clone(),
                songbird: cli.songbird_rpc.clone(),
                flare: cli.flare_rpc.clone(),
                coston: cli.coston_rpc.clone(),
                coston2: cli.coston2_rpc.clone(),
            },
            paths: ProjectPaths::new(cli.test_path.as_deref()),
            default_network: DEFAULT_NETWORK.to_string(),
        }
    }

    /// Corpus slice size for the configured execution mode
    pub fn corpus_limit(&self) -> usize {
        self.execution_mode.corpus_limit()
    }
}

/// Everything derived from [`Settings`]: the shared pool and the registry built on it
#[derive(Debug)]
pub struct Context {
    settings: Settings,
    pool: Arc<AccountPool>,
    registry: NetworkRegistry,
}

impl Context {
    /// Build the account pool and network registry. Fails fast on any configuration error.
    pub fn load(settings: Settings) -> Result<Self, ConfigError> {
        let limit = settings.corpus_limit();
        if settings.execution_mode == ExecutionMode::RemoteFork {
            warn!(target: "govsim::config", limit, "Remote-fork mode: truncating account corpus");
        }

        let pool = Arc::new(AccountPool::build(&settings.keys, &settings.corpus_path, limit)?);
        let registry = NetworkRegistry::new(Arc::clone(&pool), &settings.rpc_overrides)?;

        Ok(Self { settings, pool, registry })
    }

    /// Resolved settings
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Shared account pool
    pub fn pool(&self) -> &Arc<AccountPool> {
        &self.pool
    }

    /// Network profiles
    pub fn registry(&self) -> &NetworkRegistry {
        &self.registry
    }
}

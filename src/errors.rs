use alloy_primitives::Address;
use std::path::PathBuf;
use thiserror::Error;

use crate::accounts::{KeyParseError, KeySource};

/// Configuration errors. All are fatal and raised before any chain interaction.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Account corpus file is missing or unreadable
    #[error("Failed to read account corpus {}: {source}", path.display())]
    CorpusRead {
        /// Corpus path
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Account corpus is not a JSON array
    #[error("Failed to parse account corpus {}: {source}", path.display())]
    CorpusParse {
        /// Corpus path
        path: PathBuf,
        /// Underlying JSON error
        source: serde_json::Error,
    },

    /// A corpus element failed structural validation
    #[error("Invalid corpus record #{index}: {reason}")]
    InvalidRecord {
        /// Position of the record in the corpus file
        index: usize,
        /// What was wrong with it
        reason: String,
    },

    /// A private key could not be parsed (the key itself is never included)
    #[error("Invalid private key from {origin}: {reason}")]
    InvalidPrivateKey {
        /// Where the key came from
        origin: KeySource,
        /// Parse failure
        #[source]
        reason: KeyParseError,
    },

    /// A balance could not be parsed as an unsigned integer
    #[error("Invalid balance {value:?} from {origin}")]
    InvalidBalance {
        /// Where the balance came from
        origin: KeySource,
        /// Raw balance text
        value: String,
    },

    /// Two sources resolved to the same key after precedence filtering
    #[error("Duplicate account {address}: provided by both {first} and {second}")]
    DuplicateAccount {
        /// Address derived from the duplicated key
        address: Address,
        /// Source that claimed the key first
        first: KeySource,
        /// Source that repeated it
        second: KeySource,
    },

    /// Voter count of zero
    #[error("Voter count must be at least 1")]
    InvalidVoterCount,

    /// More voters requested than the pool can provide
    #[error("Requested {requested} voters but only {eligible} accounts are eligible to vote")]
    TooManyVoters {
        /// Requested voter count
        requested: usize,
        /// Accounts available for the voting role
        eligible: usize,
    },

    /// Network name not present in the registry
    #[error("Unknown network '{name}' (available: {available})")]
    UnknownNetwork {
        /// Requested name
        name: String,
        /// Comma-separated list of known names
        available: String,
    },

    /// Operation requires the in-process network
    #[error("Network '{0}' is not an in-process chain")]
    NotInProcess(String),

    /// Profile start date is not a valid `YYYY-MM-DD` date
    #[error("Invalid initial date {value:?}: {source}")]
    InvalidDate {
        /// Raw date text
        value: String,
        /// Parse failure
        source: chrono::ParseError,
    },

    /// Profile start date falls before the Unix epoch
    #[error("Initial date {0:?} is before 1970-01-01")]
    DateBeforeEpoch(String),

    /// Genesis could not be built or serialized
    #[error("Failed to serialize genesis: {0}")]
    SerializeGenesis(#[source] serde_json::Error),

    /// Genesis file could not be written
    #[error("Failed to write genesis file {}: {source}", path.display())]
    WriteGenesis {
        /// Output path
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },
}

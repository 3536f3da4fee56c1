use alloy_primitives::Address;
use thiserror::Error;

use crate::errors::ConfigError;

/// Failure of a simulation task
#[derive(Debug, Error)]
pub enum DriverError {
    /// Rejected before the routine ran
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Raised by the routine, passed through unchanged
    #[error("{0}")]
    Execution(eyre::Report),
}

impl DriverError {
    /// Convert into a report. Execution errors come back as the routine's own
    /// report, with every `wrap_err` cause intact.
    pub fn into_report(self) -> eyre::Report {
        match self {
            Self::Execution(report) => report,
            config @ Self::Config(_) => eyre::Report::new(config),
        }
    }
}

/// Errors while signing or checking a ballot
#[derive(Debug, Error)]
pub enum BallotError {
    /// Signing with the voter key failed
    #[error("Signing failed: {0}")]
    SigningFailed(String),

    /// Calldata is not a sealed ballot
    #[error("Malformed ballot: expected {expected} bytes, got {got}")]
    Malformed {
        /// Expected calldata length
        expected: usize,
        /// Actual calldata length
        got: usize,
    },

    /// Signature bytes do not decode or recover
    #[error("Invalid ballot signature: {0}")]
    InvalidSignature(String),

    /// Recovered signer differs from the transaction sender
    #[error("Ballot signed by {signer} but sent by {sender}")]
    SignerMismatch {
        /// Recovered signer
        signer: Address,
        /// Transaction sender
        sender: Address,
    },
}

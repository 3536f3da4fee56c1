use alloy_primitives::{Address, B256};
use alloy_signer_local::PrivateKeySigner;
use serde::{Serialize, Serializer};
use std::fmt;
use std::hash::{Hash, Hasher};
use thiserror::Error;

/// Reasons a private key string is rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyParseError {
    /// Not 32 bytes of hex
    #[error("expected 64 hex digits, got {0}")]
    InvalidLength(usize),

    /// Contains non-hex characters
    #[error("key is not valid hex")]
    InvalidHex,

    /// Zero or not below the secp256k1 group order
    #[error("key is not a valid secp256k1 secret")]
    OutOfRange,
}

/// A secp256k1 signing key held in canonical form (`0x` + 64 lowercase hex digits).
///
/// `Debug` and `Display` only ever show the derived address. The secret is
/// reachable through [`PrivateKey::expose`] and through `Serialize`, which
/// produces the account table handed to the in-process chain.
#[derive(Clone)]
pub struct PrivateKey {
    hex: String,
    signer: PrivateKeySigner,
}

impl PrivateKey {
    /// Parse a key with or without the `0x` prefix.
    pub fn parse(raw: &str) -> Result<Self, KeyParseError> {
        let trimmed = raw.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);

        if digits.len() != 64 {
            return Err(KeyParseError::InvalidLength(digits.len()));
        }

        let mut bytes = [0u8; 32];
        hex::decode_to_slice(digits, &mut bytes).map_err(|_| KeyParseError::InvalidHex)?;

        let signer = PrivateKeySigner::from_bytes(&B256::from(bytes))
            .map_err(|_| KeyParseError::OutOfRange)?;

        Ok(Self { hex: format!("0x{}", hex::encode(bytes)), signer })
    }

    /// Address controlled by this key
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// Local signer for this key
    pub fn signer(&self) -> &PrivateKeySigner {
        &self.signer
    }

    /// The canonical secret string
    pub fn expose(&self) -> &str {
        &self.hex
    }
}

impl PartialEq for PrivateKey {
    fn eq(&self, other: &Self) -> bool {
        self.hex == other.hex
    }
}

impl Eq for PrivateKey {}

impl Hash for PrivateKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.hex.hash(state);
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PrivateKey").field(&self.address()).finish()
    }
}

impl fmt::Display for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<key for {}>", self.address())
    }
}

impl Serialize for PrivateKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.hex)
    }
}

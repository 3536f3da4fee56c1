use alloy_primitives::{keccak256, Address, Bytes, Signature, B256};
use alloy_signer::Signer;
use alloy_signer_local::PrivateKeySigner;

use super::errors::BallotError;

/// Domain tag mixed into every ballot hash
const BALLOT_DOMAIN: &[u8] = b"govsim/ballot/v1";

/// Sealed ballot calldata: proposal id (32) || support (1) || signature (65)
pub const SEALED_BALLOT_LENGTH: usize = 32 + 1 + 65;

/// A vote on one proposal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ballot {
    /// Proposal being voted on
    pub proposal_id: B256,
    /// `true` = for, `false` = against
    pub support: bool,
}

impl Ballot {
    /// Hash signed by the voter
    pub fn signing_hash(&self) -> B256 {
        let mut preimage = Vec::with_capacity(BALLOT_DOMAIN.len() + 33);
        preimage.extend_from_slice(BALLOT_DOMAIN);
        preimage.extend_from_slice(self.proposal_id.as_slice());
        preimage.push(u8::from(self.support));
        keccak256(preimage)
    }

    /// Sign the ballot and encode it as calldata
    pub async fn seal(&self, signer: &PrivateKeySigner) -> Result<Bytes, BallotError> {
        let signature = signer
            .sign_hash(&self.signing_hash())
            .await
            .map_err(|e| BallotError::SigningFailed(e.to_string()))?;

        let mut data = Vec::with_capacity(SEALED_BALLOT_LENGTH);
        data.extend_from_slice(self.proposal_id.as_slice());
        data.push(u8::from(self.support));
        data.extend_from_slice(&signature_to_bytes(&signature));
        Ok(data.into())
    }

    /// Decode sealed calldata and recover the signer
    pub fn open(data: &[u8]) -> Result<(Self, Address), BallotError> {
        if data.len() != SEALED_BALLOT_LENGTH {
            return Err(BallotError::Malformed { expected: SEALED_BALLOT_LENGTH, got: data.len() });
        }

        let ballot = Self { proposal_id: B256::from_slice(&data[..32]), support: data[32] != 0 };
        let signature = bytes_to_signature(&data[33..])?;
        let signer = signature
            .recover_address_from_prehash(&ballot.signing_hash())
            .map_err(|e| BallotError::InvalidSignature(e.to_string()))?;

        Ok((ballot, signer))
    }

    /// Decode, recover, and check the signer is `sender`
    pub fn verify(data: &[u8], sender: Address) -> Result<Self, BallotError> {
        let (ballot, signer) = Self::open(data)?;
        if signer != sender {
            return Err(BallotError::SignerMismatch { signer, sender });
        }
        Ok(ballot)
    }
}

/// Convert a signature to bytes (r || s || v)
pub fn signature_to_bytes(sig: &Signature) -> [u8; 65] {
    let mut bytes = [0u8; 65];
    bytes[..32].copy_from_slice(&sig.r().to_be_bytes::<32>());
    bytes[32..64].copy_from_slice(&sig.s().to_be_bytes::<32>());
    bytes[64] = sig.v() as u8;
    bytes
}

/// Convert bytes to a signature
pub fn bytes_to_signature(bytes: &[u8]) -> Result<Signature, BallotError> {
    Signature::try_from(bytes).map_err(|e| BallotError::InvalidSignature(e.to_string()))
}

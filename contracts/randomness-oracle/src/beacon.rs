use cosmwasm_std::Timestamp;
use drand_verify::{G2PubkeyRfc, Pubkey};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// drand quicknet public key (G2, 96 bytes), scheme bls-unchained-g1-rfc9380.
pub const QUICKNET_PK_HEX: &str = "83cf0f2896adee7eb8b5f01fcad3912212c437e0073e911fb90022d3e760183c8c4b450b6a0a6c3ac6a5776a2d1064510d1fec758c921cc22b0e17e63aaf4bcb5ed66304de9cf809bd274ca73bab4af5a6e9c76a4bc09e76eae8991ef5ece45a";

#[derive(Error, Debug, PartialEq)]
pub enum BeaconError {
    #[error("invalid pubkey length: expected 96 bytes, got {got}")]
    InvalidPubkeyLength { got: usize },

    #[error("pubkey is not a valid G2 point")]
    InvalidPubkey,

    #[error("verification error: {reason}")]
    Verification { reason: String },

    #[error("signature is not valid for round {round}")]
    InvalidSignature { round: u64 },
}

/// Verify an unchained quicknet beacon and derive its randomness,
/// `sha256(signature)`.
pub fn verify_quicknet_beacon(
    pubkey: &[u8],
    round: u64,
    signature: &[u8],
) -> Result<[u8; 32], BeaconError> {
    let pk_fixed: [u8; 96] = pubkey
        .try_into()
        .map_err(|_| BeaconError::InvalidPubkeyLength { got: pubkey.len() })?;
    let pk = G2PubkeyRfc::from_fixed(pk_fixed).map_err(|_| BeaconError::InvalidPubkey)?;

    let valid = pk
        .verify(round, &[], signature)
        .map_err(|e| BeaconError::Verification {
            reason: format!("{:?}", e),
        })?;
    if !valid {
        return Err(BeaconError::InvalidSignature { round });
    }

    Ok(Sha256::digest(signature).into())
}

/// Latest drand round published at `time`; 0 before genesis.
pub fn round_at(genesis_time: u64, period_seconds: u64, time: Timestamp) -> u64 {
    let now = time.seconds();
    if now < genesis_time || period_seconds == 0 {
        return 0;
    }
    (now - genesis_time) / period_seconds + 1
}

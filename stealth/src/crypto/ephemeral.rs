//! Nonce- and chain-scoped ephemeral keys
//!
//! Path below the viewing node:
//! `m/<coinType[31..28]>'/<coinType[27..0]>'/<nonce / 2^28>'/<nonce % 2^28>'`
//! where coinType = 0x80000000 | chainId (ENSIP-11).

use bitcoin::bip32::ChildNumber;
use secp256k1::{PublicKey, Secp256k1};

use super::keys::{hardened, ViewingNode};
use super::SecretScalar;
use crate::error::{Result, StealthError};

/// Each nonce path component carries 28 bits
pub const NONCE_COMPONENT_RANGE: u64 = 0x1000_0000;

/// Largest nonce whose parent component still fits a hardened index
pub const MAX_NONCE: u64 = NONCE_COMPONENT_RANGE * 0x8000_0000 - 1;

/// ENSIP-11 coin type for an EVM chain id
pub fn coin_type(chain_id: u64) -> Result<u32> {
    if chain_id >= 0x8000_0000 {
        return Err(StealthError::DerivationError(format!(
            "chain id {} does not fit an ENSIP-11 coin type",
            chain_id
        )));
    }
    Ok(0x8000_0000 | chain_id as u32)
}

/// Hardened path from the viewing node to the ephemeral key for `nonce`
pub fn ephemeral_path(nonce: u64, chain_id: u64) -> Result<[ChildNumber; 4]> {
    if nonce > MAX_NONCE {
        return Err(StealthError::DerivationError(format!(
            "nonce {} exceeds {}",
            nonce, MAX_NONCE
        )));
    }
    let coin = coin_type(chain_id)?;
    let parent_nonce = (nonce / NONCE_COMPONENT_RANGE) as u32;
    let child_nonce = (nonce % NONCE_COMPONENT_RANGE) as u32;

    Ok([
        hardened(coin >> 28)?,
        hardened(coin & 0x0fff_ffff)?,
        hardened(parent_nonce)?,
        hardened(child_nonce)?,
    ])
}

/// One-time key blinding a single stealth address
pub struct EphemeralKey {
    pub nonce: u64,
    pub chain_id: u64,
    secret: SecretScalar,
    pub public_key: PublicKey,
}

impl EphemeralKey {
    pub fn derive(node: &ViewingNode, nonce: u64, chain_id: u64) -> Result<Self> {
        let path = ephemeral_path(nonce, chain_id)?;
        let key = node.derive(&path)?;
        let secp = Secp256k1::signing_only();
        let public_key = PublicKey::from_secret_key(&secp, &key);

        Ok(Self {
            nonce,
            chain_id,
            secret: SecretScalar::from_secret_key(&key),
            public_key,
        })
    }

    pub(crate) fn secret(&self) -> &SecretScalar {
        &self.secret
    }

    /// Ephemeral private key bytes (use carefully)
    pub fn secret_bytes(&self) -> [u8; 32] {
        *self.secret.as_bytes()
    }
}

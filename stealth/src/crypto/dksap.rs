//! Stealth address computation on secp256k1
//!
//! ### Sender side (resolver)
//! 1. Ephemeral key pair (r, R) derived from the viewing node
//! 2. Shared point: S = r·B
//! 3. h = keccak256(S.x)
//! 4. Stealth pubkey: P = B + h·G, address = keccak256(P)[12..]
//!
//! ### Recipient side
//! 1. Shared point: S = b·R (same as sender)
//! 2. Stealth private key: p = b + h

use secp256k1::{PublicKey, Scalar, Secp256k1, SecretKey};
use subtle::ConstantTimeEq;

use super::ephemeral::EphemeralKey;
use super::keys::StealthKeys;
use super::{keccak256, SecretScalar};
use crate::address::EthAddress;
use crate::error::{Result, StealthError};

/// A one-time receiving address together with what produced it
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StealthAddress {
    pub nonce: u64,
    pub address: EthAddress,
    /// Published so the recipient can recompute the shared point
    pub ephemeral_pubkey: PublicKey,
}

/// keccak256 of the x-coordinate of `secret·point`
pub fn shared_secret_hash(secret: &SecretKey, point: &PublicKey) -> Result<[u8; 32]> {
    let secp = Secp256k1::verification_only();
    let shared = point
        .mul_tweak(&secp, &Scalar::from(*secret))
        .map_err(|e| StealthError::derivation("shared point", e))?;
    Ok(keccak256(&shared.serialize()[1..]))
}

fn hash_to_secret(hash: &[u8; 32]) -> Result<SecretKey> {
    SecretKey::from_slice(hash).map_err(|e| StealthError::derivation("shared secret hash", e))
}

/// P = B + h·G
pub fn stealth_public_key(spending_pubkey: &PublicKey, hash: &[u8; 32]) -> Result<PublicKey> {
    let secp = Secp256k1::signing_only();
    let tweak_point = hash_to_secret(hash)?.public_key(&secp);
    spending_pubkey
        .combine(&tweak_point)
        .map_err(|e| StealthError::derivation("point addition", e))
}

/// Compute the stealth address for one ephemeral key (sender side)
pub fn compute_stealth_address(
    spending_pubkey: &PublicKey,
    ephemeral: &EphemeralKey,
) -> Result<StealthAddress> {
    let hash = shared_secret_hash(&ephemeral.secret().to_secret_key()?, spending_pubkey)?;
    let stealth_pubkey = stealth_public_key(spending_pubkey, &hash)?;

    Ok(StealthAddress {
        nonce: ephemeral.nonce,
        address: EthAddress::from_public_key(&stealth_pubkey),
        ephemeral_pubkey: ephemeral.public_key,
    })
}

/// Derive the private key controlling a stealth address (recipient side)
///
/// p = b + h, where h comes from b·R
pub fn derive_stealth_private_key(
    spending_secret: &SecretKey,
    ephemeral_pubkey: &PublicKey,
) -> Result<SecretScalar> {
    let hash = shared_secret_hash(spending_secret, ephemeral_pubkey)?;
    let tweak = Scalar::from(hash_to_secret(&hash)?);
    let stealth_secret = spending_secret
        .add_tweak(&tweak)
        .map_err(|e| StealthError::derivation("stealth private key", e))?;
    Ok(SecretScalar::from_secret_key(&stealth_secret))
}

/// Check whether `candidate` was generated for the holder of `spending_secret`
pub fn check_stealth_address(
    spending_secret: &SecretKey,
    ephemeral_pubkey: &PublicKey,
    candidate: &EthAddress,
) -> bool {
    let secp = Secp256k1::signing_only();
    let spending_pubkey = spending_secret.public_key(&secp);

    let expected = match shared_secret_hash(spending_secret, ephemeral_pubkey)
        .and_then(|hash| stealth_public_key(&spending_pubkey, &hash))
    {
        Ok(pubkey) => EthAddress::from_public_key(&pubkey),
        Err(_) => return false,
    };

    // Use constant-time comparison to prevent timing attacks
    bool::from(expected.as_bytes()[..].ct_eq(&candidate.as_bytes()[..]))
}

impl StealthKeys {
    /// Private key for the stealth address announced with `ephemeral_pubkey`
    pub fn stealth_private_key(&self, ephemeral_pubkey: &PublicKey) -> Result<SecretScalar> {
        derive_stealth_private_key(&self.spending_secret()?, ephemeral_pubkey)
    }

    /// Whether `candidate` belongs to this identity
    pub fn owns(&self, ephemeral_pubkey: &PublicKey, candidate: &EthAddress) -> bool {
        match self.spending_secret() {
            Ok(secret) => check_stealth_address(&secret, ephemeral_pubkey, candidate),
            Err(_) => false,
        }
    }
}

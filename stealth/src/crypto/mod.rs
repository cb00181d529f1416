pub mod dksap;
pub mod ephemeral;
pub mod keys;

pub use dksap::*;
pub use ephemeral::*;
pub use keys::*;

use secp256k1::SecretKey;
use sha3::{Digest, Keccak256};
use zeroize::Zeroize;

use crate::error::{Result, StealthError};

/// Keccak-256 as used by Ethereum (not NIST SHA3-256)
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut out = [0u8; 32];
    out.copy_from_slice(&Keccak256::digest(data));
    out
}

// ============================================================================
// Zeroizing Scalar Wrapper
// ============================================================================

/// A secp256k1 private scalar that zeroizes its bytes on drop
///
/// Clone is NOT derived to prevent accidental secret duplication.
pub struct SecretScalar {
    bytes: [u8; 32],
}

impl SecretScalar {
    /// Wrap raw bytes, rejecting zero and values >= the curve order
    pub fn from_bytes(bytes: [u8; 32]) -> Result<Self> {
        SecretKey::from_slice(&bytes)
            .map_err(|e| StealthError::derivation("scalar out of range", e))?;
        Ok(Self { bytes })
    }

    pub fn from_secret_key(key: &SecretKey) -> Self {
        Self {
            bytes: key.secret_bytes(),
        }
    }

    pub fn to_secret_key(&self) -> Result<SecretKey> {
        SecretKey::from_slice(&self.bytes)
            .map_err(|e| StealthError::derivation("scalar out of range", e))
    }

    /// Get the raw bytes (use carefully)
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.bytes
    }
}

impl Drop for SecretScalar {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

impl std::fmt::Debug for SecretScalar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SecretScalar(..)")
    }
}

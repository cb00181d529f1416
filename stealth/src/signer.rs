//! Signature oracle capability and a local EIP-191 implementation
//!
//! The oracle signs the challenge message once per request. Its output is the
//! only secret the key derivation engine consumes.

use std::fmt;
use std::str::FromStr;

use secp256k1::ecdsa::{RecoverableSignature, RecoveryId};
use secp256k1::{Message, PublicKey, Secp256k1, SecretKey};

use crate::address::EthAddress;
use crate::crypto::{keccak256, SecretScalar};
use crate::error::{Result, StealthError};

pub const SIGNATURE_LENGTH: usize = 65;

/// Raw `r || s || v` signature bytes
#[derive(Clone, PartialEq, Eq)]
pub struct Signature([u8; SIGNATURE_LENGTH]);

impl Signature {
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let arr: [u8; SIGNATURE_LENGTH] = bytes.try_into().map_err(|_| {
            StealthError::InvalidSignature(format!(
                "expected {} bytes, got {}",
                SIGNATURE_LENGTH,
                bytes.len()
            ))
        })?;
        Ok(Self(arr))
    }

    pub fn as_bytes(&self) -> &[u8; SIGNATURE_LENGTH] {
        &self.0
    }

    pub fn r(&self) -> &[u8] {
        &self.0[..32]
    }

    pub fn s(&self) -> &[u8] {
        &self.0[32..64]
    }

    pub fn v(&self) -> u8 {
        self.0[64]
    }

    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }
}

impl FromStr for Signature {
    type Err = StealthError;

    fn from_str(s: &str) -> Result<Self> {
        let stripped = s.strip_prefix("0x").unwrap_or(s);
        let bytes =
            hex::decode(stripped).map_err(|e| StealthError::InvalidSignature(e.to_string()))?;
        Self::from_slice(&bytes)
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({})", self.to_hex())
    }
}

/// Anything that can produce a deterministic signature over the challenge
///
/// Implementations may block (remote signers, hardware). Callers that run on
/// an async runtime are expected to move the call off the reactor.
pub trait SignatureOracle: Send + Sync {
    /// Address whose key produces the signatures
    fn address(&self) -> EthAddress;

    /// Sign `message` with EIP-191 `personal_sign` semantics
    fn sign(&self, message: &[u8]) -> Result<Signature>;
}

/// EIP-191 digest: keccak256("\x19Ethereum Signed Message:\n" || len || message)
pub fn personal_message_hash(message: &[u8]) -> [u8; 32] {
    let mut prefixed = Vec::with_capacity(32 + message.len());
    prefixed.extend_from_slice(b"\x19Ethereum Signed Message:\n");
    prefixed.extend_from_slice(message.len().to_string().as_bytes());
    prefixed.extend_from_slice(message);
    keccak256(&prefixed)
}

/// Recover the signing address from a `personal_sign` signature
pub fn recover_signer(message: &[u8], signature: &Signature) -> Result<EthAddress> {
    let v = signature.v();
    let recovery = match v {
        27 | 28 => v - 27,
        0 | 1 => v,
        other => {
            return Err(StealthError::InvalidSignature(format!(
                "unsupported recovery byte {}",
                other
            )))
        }
    };
    let id = RecoveryId::from_i32(recovery as i32)
        .map_err(|e| StealthError::InvalidSignature(e.to_string()))?;
    let sig = RecoverableSignature::from_compact(&signature.as_bytes()[..64], id)
        .map_err(|e| StealthError::InvalidSignature(e.to_string()))?;

    let secp = Secp256k1::verification_only();
    let msg = Message::from_digest(personal_message_hash(message));
    let key = secp
        .recover_ecdsa(&msg, &sig)
        .map_err(|e| StealthError::InvalidSignature(e.to_string()))?;
    Ok(EthAddress::from_public_key(&key))
}

/// In-process signer holding a secp256k1 private key
///
/// Signing is RFC 6979 deterministic, so a fixed key and message always give
/// the same signature.
pub struct LocalSigner {
    secret: SecretScalar,
    address: EthAddress,
}

impl LocalSigner {
    pub fn from_bytes(bytes: [u8; 32]) -> Result<Self> {
        let secret = SecretScalar::from_bytes(bytes)
            .map_err(|_| StealthError::SigningUnavailable("invalid signer key".into()))?;
        let secp = Secp256k1::signing_only();
        let public = PublicKey::from_secret_key(&secp, &secret.to_secret_key()?);
        Ok(Self {
            secret,
            address: EthAddress::from_public_key(&public),
        })
    }

    pub fn from_secret_key(key: &SecretKey) -> Self {
        let secp = Secp256k1::signing_only();
        let public = PublicKey::from_secret_key(&secp, key);
        Self {
            secret: SecretScalar::from_secret_key(key),
            address: EthAddress::from_public_key(&public),
        }
    }
}

impl SignatureOracle for LocalSigner {
    fn address(&self) -> EthAddress {
        self.address
    }

    fn sign(&self, message: &[u8]) -> Result<Signature> {
        let key = self
            .secret
            .to_secret_key()
            .map_err(|e| StealthError::SigningUnavailable(e.to_string()))?;
        let secp = Secp256k1::signing_only();
        let msg = Message::from_digest(personal_message_hash(message));
        let (id, compact) = secp.sign_ecdsa_recoverable(&msg, &key).serialize_compact();

        let mut out = [0u8; SIGNATURE_LENGTH];
        out[..64].copy_from_slice(&compact);
        out[64] = 27 + id.to_i32() as u8;
        Ok(Signature(out))
    }
}

impl fmt::Debug for LocalSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalSigner")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

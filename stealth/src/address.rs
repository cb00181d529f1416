//! 20-byte Ethereum account addresses

use std::fmt;
use std::str::FromStr;

use secp256k1::PublicKey;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::crypto::keccak256;
use crate::error::{Result, StealthError};

pub const ADDRESS_LENGTH: usize = 20;

/// An Ethereum account address
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EthAddress([u8; ADDRESS_LENGTH]);

impl EthAddress {
    pub const ZERO: EthAddress = EthAddress([0u8; ADDRESS_LENGTH]);

    pub fn from_array(bytes: [u8; ADDRESS_LENGTH]) -> Self {
        Self(bytes)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let arr: [u8; ADDRESS_LENGTH] = bytes.try_into().map_err(|_| {
            StealthError::InvalidAddress(format!(
                "expected {} bytes, got {}",
                ADDRESS_LENGTH,
                bytes.len()
            ))
        })?;
        Ok(Self(arr))
    }

    /// Standard account-address derivation: last 20 bytes of
    /// keccak256 over the uncompressed point without its 0x04 prefix
    pub fn from_public_key(key: &PublicKey) -> Self {
        let uncompressed = key.serialize_uncompressed();
        let hash = keccak256(&uncompressed[1..]);
        let mut bytes = [0u8; ADDRESS_LENGTH];
        bytes.copy_from_slice(&hash[12..]);
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; ADDRESS_LENGTH] {
        &self.0
    }

    /// EIP-55 mixed-case checksum encoding
    pub fn to_checksum(&self) -> String {
        let lower = hex::encode(self.0);
        let hash = keccak256(lower.as_bytes());

        let mut out = String::with_capacity(2 + 2 * ADDRESS_LENGTH);
        out.push_str("0x");
        for (i, c) in lower.chars().enumerate() {
            let nibble = (hash[i / 2] >> (if i % 2 == 0 { 4 } else { 0 })) & 0x0f;
            if nibble >= 8 {
                out.push(c.to_ascii_uppercase());
            } else {
                out.push(c);
            }
        }
        out
    }
}

impl FromStr for EthAddress {
    type Err = StealthError;

    /// Accepts lowercase, uppercase or checksummed hex, with or without `0x`.
    /// Mixed-case input must carry a valid checksum.
    fn from_str(s: &str) -> Result<Self> {
        let stripped = s.strip_prefix("0x").unwrap_or(s);
        if stripped.len() != 2 * ADDRESS_LENGTH {
            return Err(StealthError::InvalidAddress(format!(
                "expected {} hex characters, got {}",
                2 * ADDRESS_LENGTH,
                stripped.len()
            )));
        }
        let bytes = hex::decode(stripped)
            .map_err(|e| StealthError::InvalidAddress(e.to_string()))?;
        let address = Self::from_slice(&bytes)?;

        let has_upper = stripped.chars().any(|c| c.is_ascii_uppercase());
        let has_lower = stripped.chars().any(|c| c.is_ascii_lowercase());
        if has_upper && has_lower && address.to_checksum()[2..] != *stripped {
            return Err(StealthError::InvalidAddress(format!(
                "checksum mismatch for {}",
                s
            )));
        }
        Ok(address)
    }
}

impl fmt::Display for EthAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_checksum())
    }
}

impl fmt::Debug for EthAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EthAddress({})", self.to_checksum())
    }
}

impl Serialize for EthAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_checksum())
    }
}

impl<'de> Deserialize<'de> for EthAddress {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

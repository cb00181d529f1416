//! Challenge message signed to bootstrap the key hierarchy
//!
//! The text must match the companion verifier byte-for-byte. Changing a single
//! character changes every derived address.

use crate::address::EthAddress;
use crate::crypto::keccak256;
use crate::error::{Result, StealthError};

const MESSAGE_HEADER: &str = "Sign this message to generate your stealth payment keys.";
const MESSAGE_WARNING: &str =
    "WARNING: Only sign this message within a trusted website or platform to avoid loss of funds.";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChallengeMessage {
    text: String,
}

impl ChallengeMessage {
    /// Build the message for `signer` protected by `pin`
    ///
    /// secret = keccak256(checksum(signer) || pin)
    pub fn new(pin: &str, signer: &EthAddress) -> Result<Self> {
        if pin.is_empty() {
            return Err(StealthError::DerivationError(
                "challenge PIN must not be empty".into(),
            ));
        }

        let mut preimage = signer.to_checksum();
        preimage.push_str(pin);
        let secret = keccak256(preimage.as_bytes());

        let text = format!(
            "{}\n\n{}\n\nSecret: 0x{}",
            MESSAGE_HEADER,
            MESSAGE_WARNING,
            hex::encode(secret)
        );
        Ok(Self { text })
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.text.as_bytes()
    }
}

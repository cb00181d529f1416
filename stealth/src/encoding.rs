//! CCIP-Read response encoding
//!
//! An address occupies one ABI word: 12 zero bytes followed by the 20 address
//! bytes.

use serde::{Deserialize, Serialize};

use crate::address::{EthAddress, ADDRESS_LENGTH};

pub const WORD_LENGTH: usize = 32;
const PADDING: usize = WORD_LENGTH - ADDRESS_LENGTH;

/// Left-pad the address into a 32-byte word
pub fn encode(address: &EthAddress) -> [u8; WORD_LENGTH] {
    let mut word = [0u8; WORD_LENGTH];
    word[PADDING..].copy_from_slice(address.as_bytes());
    word
}

/// Inverse of [`encode`]; `None` if the padding bytes are not zero
pub fn decode(word: &[u8; WORD_LENGTH]) -> Option<EthAddress> {
    if word[..PADDING].iter().any(|&b| b != 0) {
        return None;
    }
    let mut bytes = [0u8; ADDRESS_LENGTH];
    bytes.copy_from_slice(&word[PADDING..]);
    Some(EthAddress::from_array(bytes))
}

/// `0x`-prefixed lowercase hex of the encoded word
pub fn encode_hex(address: &EthAddress) -> String {
    format!("0x{}", hex::encode(encode(address)))
}

/// JSON body returned to CCIP-Read clients: `{ "data": "0x..." }`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedResponse {
    pub data: String,
}

impl EncodedResponse {
    pub fn new(address: &EthAddress) -> Self {
        Self {
            data: encode_hex(address),
        }
    }
}

//! Stealth meta-address derivation for ENS CCIP-Read resolution
//!
//! A single wallet signature over a fixed challenge seeds a spending/viewing
//! key pair. The viewing key yields a BIP32 node from which one ephemeral key
//! per nonce is derived; each ephemeral key blinds the spending public key into
//! a one-time Ethereum address. One of those addresses is returned per lookup,
//! encoded as a 32-byte ABI word.

pub mod address;
pub mod crypto;
pub mod encoding;
pub mod error;
pub mod generator;
pub mod message;
pub mod pipeline;
pub mod selector;
pub mod signer;
pub mod smart_account;

#[cfg(test)]
mod test_vectors;


pub use address::EthAddress;
pub use crypto::{EphemeralKey, StealthAddress, StealthKeys, ViewingNode};
pub use encoding::{decode, encode, encode_hex, EncodedResponse};
pub use error::{Result, StealthError};
pub use generator::{generate, StealthAddressGenerator, StealthAddresses};
pub use message::ChallengeMessage;
pub use pipeline::{Resolution, ResolutionParams, StealthResolver};
pub use selector::SelectionPolicy;
pub use signer::{LocalSigner, Signature, SignatureOracle};
pub use smart_account::{AddressMapper, Create2Mapper, IdentityMapper};

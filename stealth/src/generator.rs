//! Stealth address generator
//!
//! Walks nonces in increasing order, deriving one ephemeral key per nonce and
//! combining it with the spending public key. The sequence is lazy, finite and
//! restartable: cloning the iterator or calling [`StealthAddressGenerator::iter`]
//! again replays the exact same addresses.

use std::ops::Range;

use secp256k1::PublicKey;

use crate::crypto::{compute_stealth_address, EphemeralKey, StealthAddress, ViewingNode};
use crate::error::Result;

/// Address count of the reference deployment
pub const DEFAULT_ADDRESS_COUNT: u64 = 10;

/// Largest address set a single request may derive
pub const MAX_ADDRESS_COUNT: u64 = 1000;

/// Everything needed to replay one identity's address set on one chain
pub struct StealthAddressGenerator<'a> {
    node: &'a ViewingNode,
    spending_pubkey: PublicKey,
    chain_id: u64,
    nonces: Range<u64>,
}

impl<'a> StealthAddressGenerator<'a> {
    pub fn new(
        node: &'a ViewingNode,
        spending_pubkey: PublicKey,
        nonces: Range<u64>,
        chain_id: u64,
    ) -> Self {
        Self {
            node,
            spending_pubkey,
            chain_id,
            nonces,
        }
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    pub fn len(&self) -> usize {
        (self.nonces.end.saturating_sub(self.nonces.start)) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> StealthAddresses<'a> {
        StealthAddresses {
            node: self.node,
            spending_pubkey: self.spending_pubkey,
            chain_id: self.chain_id,
            nonces: self.nonces.clone(),
        }
    }

    /// Generate the full set, failing on the first bad nonce
    pub fn addresses(&self) -> Result<Vec<StealthAddress>> {
        self.iter().collect()
    }
}

/// Lazy iterator over stealth addresses, one per nonce
#[derive(Clone)]
pub struct StealthAddresses<'a> {
    node: &'a ViewingNode,
    spending_pubkey: PublicKey,
    chain_id: u64,
    nonces: Range<u64>,
}

impl Iterator for StealthAddresses<'_> {
    type Item = Result<StealthAddress>;

    fn next(&mut self) -> Option<Self::Item> {
        let nonce = self.nonces.next()?;
        Some(
            EphemeralKey::derive(self.node, nonce, self.chain_id)
                .and_then(|ephemeral| compute_stealth_address(&self.spending_pubkey, &ephemeral)),
        )
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.nonces.size_hint()
    }
}

impl ExactSizeIterator for StealthAddresses<'_> {}

/// Generate the stealth addresses for `nonces` on `chain_id`
pub fn generate<'a>(
    node: &'a ViewingNode,
    spending_pubkey: &PublicKey,
    nonces: Range<u64>,
    chain_id: u64,
) -> StealthAddresses<'a> {
    StealthAddressGenerator::new(node, *spending_pubkey, nonces, chain_id).iter()
}

//! Per-request resolution pipeline
//!
//! signature -> keys -> viewing node -> N stealth addresses -> selection ->
//! optional smart-account mapping -> 32-byte CCIP-Read payload.
//!
//! Nothing here is cached; every request recomputes its own key material and
//! drops it on return.

use log::debug;

use crate::address::EthAddress;
use crate::crypto::{StealthAddress, StealthKeys, DEFAULT_VIEWING_NODE};
use crate::encoding::EncodedResponse;
use crate::error::{Result, StealthError};
use crate::generator::{StealthAddressGenerator, DEFAULT_ADDRESS_COUNT, MAX_ADDRESS_COUNT};
use crate::message::ChallengeMessage;
use crate::selector::SelectionPolicy;
use crate::signer::{Signature, SignatureOracle};
use crate::smart_account::{AddressMapper, IdentityMapper};

/// Sepolia, the chain of the reference deployment
pub const DEFAULT_CHAIN_ID: u64 = 11155111;

/// Protocol parameters shared by every request of a process
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolutionParams {
    pub pin: String,
    pub chain_id: u64,
    pub address_count: u64,
    pub selection: SelectionPolicy,
    pub viewing_node: u32,
}

impl ResolutionParams {
    pub fn new(pin: impl Into<String>) -> Self {
        Self {
            pin: pin.into(),
            chain_id: DEFAULT_CHAIN_ID,
            address_count: DEFAULT_ADDRESS_COUNT,
            selection: SelectionPolicy::default(),
            viewing_node: DEFAULT_VIEWING_NODE,
        }
    }
}

/// Outcome of one resolution
#[derive(Clone, Debug)]
pub struct Resolution {
    pub selected: StealthAddress,
    /// Address actually returned; differs from `selected` when a mapper is set
    pub resolved: EthAddress,
    pub response: EncodedResponse,
}

/// Stateless resolver: parameters plus the optional mapping stage
pub struct StealthResolver {
    params: ResolutionParams,
    mapper: Box<dyn AddressMapper>,
}

impl StealthResolver {
    pub fn new(params: ResolutionParams) -> Self {
        Self {
            params,
            mapper: Box::new(IdentityMapper),
        }
    }

    pub fn with_mapper(mut self, mapper: Box<dyn AddressMapper>) -> Self {
        self.mapper = mapper;
        self
    }

    pub fn params(&self) -> &ResolutionParams {
        &self.params
    }

    /// Message the oracle must sign for `signer`
    pub fn challenge(&self, signer: &EthAddress) -> Result<ChallengeMessage> {
        ChallengeMessage::new(&self.params.pin, signer)
    }

    /// Full address set for a signature, in nonce order
    pub fn addresses(&self, signature: &Signature) -> Result<Vec<StealthAddress>> {
        if self.params.address_count == 0 || self.params.address_count > MAX_ADDRESS_COUNT {
            return Err(StealthError::DerivationError(format!(
                "address count must be between 1 and {}, got {}",
                MAX_ADDRESS_COUNT, self.params.address_count
            )));
        }
        let keys = StealthKeys::from_signature(signature)?;
        let node = keys.viewing_node(self.params.viewing_node)?;
        StealthAddressGenerator::new(
            &node,
            keys.spending_pubkey,
            0..self.params.address_count,
            self.params.chain_id,
        )
        .addresses()
    }

    /// Select, map and encode one address for a signature
    pub fn resolve_signature(&self, signature: &Signature) -> Result<Resolution> {
        let addresses = self.addresses(signature)?;
        let selected = self.params.selection.select(&addresses)?.clone();
        let resolved = self.mapper.map(&selected.address);
        debug!(
            "selected nonce {} ({} policy) on chain {}",
            selected.nonce, self.params.selection, self.params.chain_id
        );

        Ok(Resolution {
            response: EncodedResponse::new(&resolved),
            selected,
            resolved,
        })
    }

    /// Sign the challenge with `oracle` and resolve, blocking on the oracle
    pub fn resolve(&self, oracle: &dyn SignatureOracle) -> Result<Resolution> {
        let message = self.challenge(&oracle.address())?;
        let signature = oracle.sign(message.as_bytes())?;
        self.resolve_signature(&signature)
    }
}

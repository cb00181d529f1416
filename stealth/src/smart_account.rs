//! Optional post-processing of the selected stealth address
//!
//! Some deployments answer with the counterfactual smart-account address owned
//! by the stealth address instead of the stealth address itself. The mapping is
//! applied after selection and never feeds back into derivation.

use crate::address::{EthAddress, ADDRESS_LENGTH};
use crate::crypto::keccak256;

pub trait AddressMapper: Send + Sync {
    fn map(&self, owner: &EthAddress) -> EthAddress;
}

/// Return the stealth address unchanged
#[derive(Clone, Copy, Debug, Default)]
pub struct IdentityMapper;

impl AddressMapper for IdentityMapper {
    fn map(&self, owner: &EthAddress) -> EthAddress {
        *owner
    }
}

/// EIP-1014 CREATE2 address prediction
pub fn create2_address(
    deployer: &EthAddress,
    salt: &[u8; 32],
    init_code_hash: &[u8; 32],
) -> EthAddress {
    let mut preimage = [0u8; 1 + ADDRESS_LENGTH + 32 + 32];
    preimage[0] = 0xff;
    preimage[1..21].copy_from_slice(deployer.as_bytes());
    preimage[21..53].copy_from_slice(salt);
    preimage[53..].copy_from_slice(init_code_hash);

    let hash = keccak256(&preimage);
    let mut bytes = [0u8; ADDRESS_LENGTH];
    bytes.copy_from_slice(&hash[12..]);
    EthAddress::from_array(bytes)
}

/// Smart account deployed by `factory` through CREATE2, salted by its owner
///
/// salt = owner left-padded to 32 bytes
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Create2Mapper {
    pub factory: EthAddress,
    pub init_code_hash: [u8; 32],
}

impl Create2Mapper {
    pub fn new(factory: EthAddress, init_code_hash: [u8; 32]) -> Self {
        Self {
            factory,
            init_code_hash,
        }
    }
}

impl AddressMapper for Create2Mapper {
    fn map(&self, owner: &EthAddress) -> EthAddress {
        let salt = crate::encoding::encode(owner);
        create2_address(&self.factory, &salt, &self.init_code_hash)
    }
}

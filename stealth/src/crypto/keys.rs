//! Key derivation engine
//!
//! Turns one signature into the spending/viewing key pair and the viewing
//! node that seeds every ephemeral key of a request.
//!
//! ## Derivation
//! 1. spending = keccak256(sig.r), viewing = keccak256(sig.s)
//! 2. Spending public key B = spending·G
//! 3. Viewing node = BIP32 master(viewing) / 5564' / node'

use bitcoin::bip32::{ChildNumber, Xpriv};
use bitcoin::NetworkKind;
use secp256k1::{PublicKey, Secp256k1, SecretKey};

use super::{keccak256, SecretScalar};
use crate::error::{Result, StealthError};
use crate::signer::Signature;

/// Hardened purpose index of the viewing node (EIP-5564)
pub const VIEWING_NODE_PURPOSE: u32 = 5564;

/// Node index every request derives from
pub const DEFAULT_VIEWING_NODE: u32 = 0;

// ============================================================================
// Stealth Keys
// ============================================================================

/// Spending/viewing key pair for one stealth identity
///
/// Secrets are zeroized on drop; Clone is NOT derived.
pub struct StealthKeys {
    spending_secret: SecretScalar,
    viewing_secret: SecretScalar,
    /// Spending public key (B = b·G)
    pub spending_pubkey: PublicKey,
    /// Viewing public key (V = v·G)
    pub viewing_pubkey: PublicKey,
}

impl StealthKeys {
    /// Split a signature into spending and viewing keys
    pub fn from_signature(signature: &Signature) -> Result<Self> {
        if signature.r().iter().all(|&b| b == 0) || signature.s().iter().all(|&b| b == 0) {
            return Err(StealthError::InvalidSignature(
                "signature component is zero".into(),
            ));
        }

        let spending = keccak256(signature.r());
        let viewing = keccak256(signature.s());
        Self::from_secrets(spending, viewing)
    }

    /// Reconstruct keys from raw secret bytes
    pub fn from_secrets(spending: [u8; 32], viewing: [u8; 32]) -> Result<Self> {
        let spending_secret = SecretScalar::from_bytes(spending)?;
        let viewing_secret = SecretScalar::from_bytes(viewing)?;

        let secp = Secp256k1::signing_only();
        let spending_pubkey =
            PublicKey::from_secret_key(&secp, &spending_secret.to_secret_key()?);
        let viewing_pubkey = PublicKey::from_secret_key(&secp, &viewing_secret.to_secret_key()?);

        Ok(Self {
            spending_secret,
            viewing_secret,
            spending_pubkey,
            viewing_pubkey,
        })
    }

    /// Extract the viewing node at `m/5564'/index'`
    pub fn viewing_node(&self, index: u32) -> Result<ViewingNode> {
        ViewingNode::from_viewing_key(&self.viewing_secret, index)
    }

    /// EIP-5564 meta-address: `st:eth:0x<spending pubkey><viewing pubkey>`
    pub fn meta_address(&self) -> String {
        format!(
            "st:eth:0x{}{}",
            hex::encode(self.spending_pubkey.serialize()),
            hex::encode(self.viewing_pubkey.serialize())
        )
    }

    /// Export secrets as bytes
    ///
    /// WARNING: Handle these bytes with extreme care!
    pub fn export_secrets(&self) -> ([u8; 32], [u8; 32]) {
        (*self.spending_secret.as_bytes(), *self.viewing_secret.as_bytes())
    }

    pub(crate) fn spending_secret(&self) -> Result<SecretKey> {
        self.spending_secret.to_secret_key()
    }
}

// ============================================================================
// Viewing Node
// ============================================================================

/// BIP32 sub-node of the viewing key; parent of all ephemeral keys
pub struct ViewingNode {
    xpriv: Xpriv,
    index: u32,
}

impl ViewingNode {
    pub fn from_viewing_key(viewing: &SecretScalar, index: u32) -> Result<Self> {
        let master = Xpriv::new_master(NetworkKind::Main, viewing.as_bytes())
            .map_err(|e| StealthError::derivation("viewing master key", e))?;
        let path = [hardened(VIEWING_NODE_PURPOSE)?, hardened(index)?];

        let secp = Secp256k1::signing_only();
        let xpriv = master
            .derive_priv(&secp, &path)
            .map_err(|e| StealthError::derivation("viewing node", e))?;
        Ok(Self { xpriv, index })
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn depth(&self) -> u8 {
        self.xpriv.depth
    }

    /// Node private key bytes (use carefully)
    pub fn private_key_bytes(&self) -> [u8; 32] {
        self.xpriv.private_key.secret_bytes()
    }

    pub fn chain_code(&self) -> [u8; 32] {
        self.xpriv.chain_code.to_bytes()
    }

    /// Private key of the descendant at `path`
    pub(crate) fn derive(&self, path: &[ChildNumber]) -> Result<SecretKey> {
        let secp = Secp256k1::signing_only();
        let child = self
            .xpriv
            .derive_priv(&secp, &path)
            .map_err(|e| StealthError::derivation("child key", e))?;
        Ok(child.private_key)
    }
}

impl std::fmt::Debug for ViewingNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewingNode")
            .field("index", &self.index)
            .field("depth", &self.xpriv.depth)
            .finish_non_exhaustive()
    }
}

pub(crate) fn hardened(index: u32) -> Result<ChildNumber> {
    ChildNumber::from_hardened_idx(index)
        .map_err(|e| StealthError::derivation("hardened index out of range", e))
}

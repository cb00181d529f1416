//! Errors surfaced by the stealth resolution pipeline
//!
//! Every failure is local to one request. Derivation is a pure function of its
//! inputs, so none of these are retried inside the crate.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, StealthError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StealthError {
    /// The signature oracle could not produce a signature
    #[error("Signing unavailable: {0}")]
    SigningUnavailable(String),

    /// The signature failed structural validation before key splitting
    #[error("Invalid signature: {0}")]
    InvalidSignature(String),

    /// Intermediate key material was malformed or out of range
    #[error("Derivation error: {0}")]
    DerivationError(String),

    /// An operator-supplied address could not be parsed
    #[error("Invalid address: {0}")]
    InvalidAddress(String),
}

impl StealthError {
    pub(crate) fn derivation(context: &str, err: impl std::fmt::Display) -> Self {
        StealthError::DerivationError(format!("{}: {}", context, err))
    }
}

//! Address selection policy
//!
//! `Random` picks uniformly from the generated set on every request, so
//! repeated lookups rarely return the same address. `Primary` always returns
//! the nonce-0 address, trading unlinkability for idempotent responses.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::crypto::StealthAddress;
use crate::error::{Result, StealthError};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionPolicy {
    #[default]
    Random,
    Primary,
}

impl SelectionPolicy {
    /// Select with the thread-local RNG
    pub fn select<'a>(&self, addresses: &'a [StealthAddress]) -> Result<&'a StealthAddress> {
        self.select_with(addresses, &mut rand::thread_rng())
    }

    pub fn select_with<'a, R: Rng + ?Sized>(
        &self,
        addresses: &'a [StealthAddress],
        rng: &mut R,
    ) -> Result<&'a StealthAddress> {
        if addresses.is_empty() {
            return Err(StealthError::DerivationError(
                "no stealth addresses to select from".into(),
            ));
        }
        let index = match self {
            SelectionPolicy::Random => rng.gen_range(0..addresses.len()),
            SelectionPolicy::Primary => 0,
        };
        Ok(&addresses[index])
    }
}

impl FromStr for SelectionPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "random" => Ok(SelectionPolicy::Random),
            "primary" | "deterministic" => Ok(SelectionPolicy::Primary),
            other => Err(format!(
                "unknown selection policy '{}' (expected 'random' or 'primary')",
                other
            )),
        }
    }
}

impl fmt::Display for SelectionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionPolicy::Random => f.write_str("random"),
            SelectionPolicy::Primary => f.write_str("primary"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{StealthKeys, DEFAULT_VIEWING_NODE};
    use crate::generator::generate;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn addresses(n: u64) -> Vec<StealthAddress> {
        let keys = StealthKeys::from_secrets([0x42u8; 32], [0x43u8; 32]).unwrap();
        let node = keys.viewing_node(DEFAULT_VIEWING_NODE).unwrap();
        generate(&node, &keys.spending_pubkey, 0..n, 1)
            .collect::<Result<_>>()
            .unwrap()
    }

    #[test]
    fn test_primary_is_idempotent() {
        let set = addresses(10);
        for _ in 0..20 {
            assert_eq!(SelectionPolicy::Primary.select(&set).unwrap(), &set[0]);
        }
    }

    #[test]
    fn test_random_is_close_to_uniform() {
        let set = addresses(10);
        let mut rng = StdRng::seed_from_u64(7);
        let mut counts = [0usize; 10];
        let draws = 10_000;
        for _ in 0..draws {
            let picked = SelectionPolicy::Random.select_with(&set, &mut rng).unwrap();
            counts[picked.nonce as usize] += 1;
        }
        // Expected 1000 each; a fair draw stays well inside +/-200
        for count in counts {
            assert!((800..=1200).contains(&count), "skewed counts: {:?}", counts);
        }
    }

    #[test]
    fn test_empty_set_rejected() {
        assert!(SelectionPolicy::Random.select(&[]).is_err());
        assert!(SelectionPolicy::Primary.select(&[]).is_err());
    }

    #[test]
    fn test_parse_policy() {
        assert_eq!("random".parse::<SelectionPolicy>(), Ok(SelectionPolicy::Random));
        assert_eq!("PRIMARY".parse::<SelectionPolicy>(), Ok(SelectionPolicy::Primary));
        assert_eq!("deterministic".parse::<SelectionPolicy>(), Ok(SelectionPolicy::Primary));
        assert!("sometimes".parse::<SelectionPolicy>().is_err());
        assert_eq!(SelectionPolicy::default(), SelectionPolicy::Random);
    }
}

//! Resolver configuration
//!
//! Values come from three layers, highest precedence first: command-line
//! flags, environment variables (both handled by clap), and an optional JSON
//! file. The merged result is validated once at startup and never changes.

use std::fmt;
use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Args;
use serde::Deserialize;
use zeroize::{Zeroize, Zeroizing};

use stealth::crypto::coin_type;
use stealth::generator::{DEFAULT_ADDRESS_COUNT, MAX_ADDRESS_COUNT};
use stealth::pipeline::DEFAULT_CHAIN_ID;
use stealth::{
    Create2Mapper, EthAddress, LocalSigner, ResolutionParams, SelectionPolicy, StealthResolver,
};

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_SIGNING_TIMEOUT_MS: u64 = 5000;

/// Settings accepted on the command line or through the environment
#[derive(Args, Default, Clone)]
pub struct ConfigArgs {
    /// HTTP port to listen on [default: 8080]
    #[arg(long, env = "PORT", global = true)]
    pub port: Option<u16>,

    /// Hex private key of the signing wallet
    #[arg(long, env = "PRIVATE_KEY", global = true, hide_env_values = true)]
    pub private_key: Option<String>,

    /// PIN mixed into the challenge message
    #[arg(long, env = "STEALTH_PIN", global = true, hide_env_values = true)]
    pub pin: Option<String>,

    /// EVM chain id the addresses are derived for [default: 11155111]
    #[arg(long, env = "CHAIN_ID", global = true)]
    pub chain_id: Option<u64>,

    /// Number of stealth addresses generated per request [default: 10]
    #[arg(long, env = "ADDRESS_COUNT", global = true)]
    pub address_count: Option<u64>,

    /// Address selection policy: random or primary [default: random]
    #[arg(long, env = "SELECTION_POLICY", global = true)]
    pub selection: Option<SelectionPolicy>,

    /// Upper bound on a single signing call, in milliseconds [default: 5000]
    #[arg(long, env = "SIGNING_TIMEOUT_MS", global = true)]
    pub signing_timeout_ms: Option<u64>,

    /// CREATE2 factory of the smart account to resolve instead of the stealth address
    #[arg(long, env = "SMART_ACCOUNT_FACTORY", global = true)]
    pub smart_account_factory: Option<String>,

    /// Init code hash of the smart account (hex, 32 bytes)
    #[arg(long, env = "SMART_ACCOUNT_INIT_CODE_HASH", global = true)]
    pub smart_account_init_code_hash: Option<String>,
}

impl fmt::Debug for ConfigArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigArgs")
            .field("port", &self.port)
            .field("private_key", &self.private_key.as_ref().map(|_| "<redacted>"))
            .field("pin", &self.pin.as_ref().map(|_| "<redacted>"))
            .field("chain_id", &self.chain_id)
            .field("address_count", &self.address_count)
            .field("selection", &self.selection)
            .field("signing_timeout_ms", &self.signing_timeout_ms)
            .field("smart_account_factory", &self.smart_account_factory)
            .field("smart_account_init_code_hash", &self.smart_account_init_code_hash)
            .finish()
    }
}

/// On-disk configuration; every key is optional
#[derive(Deserialize, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub port: Option<u16>,
    pub private_key: Option<String>,
    pub pin: Option<String>,
    pub chain_id: Option<u64>,
    pub address_count: Option<u64>,
    pub selection: Option<SelectionPolicy>,
    pub signing_timeout_ms: Option<u64>,
    pub smart_account_factory: Option<String>,
    pub smart_account_init_code_hash: Option<String>,
}

impl Drop for ConfigFile {
    fn drop(&mut self) {
        if let Some(key) = self.private_key.as_mut() {
            key.zeroize();
        }
    }
}

impl ConfigFile {
    pub fn load(path: &Path) -> Result<Self> {
        let json = Zeroizing::new(
            fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?,
        );
        serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }
}

/// Validated, immutable resolver configuration
pub struct ResolverConfig {
    pub port: u16,
    signer_key: Zeroizing<[u8; 32]>,
    pub params: ResolutionParams,
    pub signing_timeout: Duration,
    pub smart_account: Option<Create2Mapper>,
}

impl ResolverConfig {
    /// Load the optional file, then apply flags and environment on top
    pub fn load(path: Option<&Path>, args: ConfigArgs) -> Result<Self> {
        let file = match path {
            Some(path) => ConfigFile::load(path)?,
            None => ConfigFile::default(),
        };
        Self::merge(args, file)
    }

    pub fn merge(mut args: ConfigArgs, mut file: ConfigFile) -> Result<Self> {
        let key_hex = Zeroizing::new(
            args.private_key
                .take()
                .or_else(|| file.private_key.take())
                .context("No private key configured. Set --private-key or PRIVATE_KEY")?,
        );
        let signer_key = parse_private_key(&key_hex)?;

        let pin = args
            .pin
            .take()
            .or_else(|| file.pin.take())
            .context("No PIN configured. Set --pin or STEALTH_PIN")?;
        if pin.is_empty() {
            bail!("PIN must not be empty");
        }

        let chain_id = args.chain_id.or(file.chain_id).unwrap_or(DEFAULT_CHAIN_ID);
        coin_type(chain_id).context("Invalid chain id")?;

        let address_count = args
            .address_count
            .or(file.address_count)
            .unwrap_or(DEFAULT_ADDRESS_COUNT);
        if address_count == 0 || address_count > MAX_ADDRESS_COUNT {
            bail!(
                "Address count must be between 1 and {}, got {}",
                MAX_ADDRESS_COUNT,
                address_count
            );
        }

        let timeout_ms = args
            .signing_timeout_ms
            .or(file.signing_timeout_ms)
            .unwrap_or(DEFAULT_SIGNING_TIMEOUT_MS);
        if timeout_ms == 0 {
            bail!("Signing timeout must be positive");
        }

        let factory = args
            .smart_account_factory
            .take()
            .or_else(|| file.smart_account_factory.take());
        let init_code_hash = args
            .smart_account_init_code_hash
            .take()
            .or_else(|| file.smart_account_init_code_hash.take());
        let smart_account = match (factory, init_code_hash) {
            (None, None) => None,
            (Some(factory), Some(hash)) => Some(Create2Mapper::new(
                factory
                    .parse::<EthAddress>()
                    .context("Invalid smart account factory address")?,
                parse_hash(&hash).context("Invalid smart account init code hash")?,
            )),
            _ => bail!(
                "--smart-account-factory and --smart-account-init-code-hash must be set together"
            ),
        };

        let mut params = ResolutionParams::new(pin);
        params.chain_id = chain_id;
        params.address_count = address_count;
        params.selection = args.selection.or(file.selection).unwrap_or_default();

        Ok(Self {
            port: args.port.or(file.port).unwrap_or(DEFAULT_PORT),
            signer_key,
            params,
            signing_timeout: Duration::from_millis(timeout_ms),
            smart_account,
        })
    }

    pub fn signer(&self) -> Result<LocalSigner> {
        LocalSigner::from_bytes(*self.signer_key).context("Invalid signing key")
    }

    /// Pipeline for these settings, including the smart-account stage if set
    pub fn resolver(&self) -> StealthResolver {
        let resolver = StealthResolver::new(self.params.clone());
        match &self.smart_account {
            Some(mapper) => resolver.with_mapper(Box::new(mapper.clone())),
            None => resolver,
        }
    }
}

impl fmt::Debug for ResolverConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolverConfig")
            .field("port", &self.port)
            .field("chain_id", &self.params.chain_id)
            .field("address_count", &self.params.address_count)
            .field("selection", &self.params.selection)
            .field("signing_timeout", &self.signing_timeout)
            .field("smart_account", &self.smart_account)
            .finish_non_exhaustive()
    }
}

fn parse_private_key(hex_key: &str) -> Result<Zeroizing<[u8; 32]>> {
    let stripped = hex_key.trim().trim_start_matches("0x");
    let bytes = Zeroizing::new(hex::decode(stripped).context("Private key is not valid hex")?);
    if bytes.len() != 32 {
        bail!("Private key must be 32 bytes, got {}", bytes.len());
    }
    let mut key = Zeroizing::new([0u8; 32]);
    key.copy_from_slice(&bytes);
    Ok(key)
}

fn parse_hash(hex_hash: &str) -> Result<[u8; 32]> {
    let bytes = hex::decode(hex_hash.trim().trim_start_matches("0x"))?;
    if bytes.len() != 32 {
        bail!("expected 32 bytes, got {}", bytes.len());
    }
    let mut hash = [0u8; 32];
    hash.copy_from_slice(&bytes);
    Ok(hash)
}

//! Display the stealth meta-address of the configured signer

use anyhow::{Context, Result};
use colored::Colorize;

use stealth::{SignatureOracle, StealthKeys};

use crate::config::ResolverConfig;

pub fn run(config: &ResolverConfig) -> Result<()> {
    let signer = config.signer()?;
    let resolver = config.resolver();
    let message = resolver.challenge(&signer.address())?;
    let signature = signer
        .sign(message.as_bytes())
        .context("Failed to sign the challenge message")?;
    let keys = StealthKeys::from_signature(&signature)?;

    println!();
    println!("{}", "Your Stealth Meta-Address".yellow().bold());
    println!();
    println!("{}", keys.meta_address());
    println!();
    println!("{}:", "Components".dimmed());
    println!("  Signer:          {}", signer.address());
    println!("  Spending pubkey: {}", hex::encode(keys.spending_pubkey.serialize()));
    println!("  Viewing pubkey:  {}", hex::encode(keys.viewing_pubkey.serialize()));
    println!();
    println!(
        "{}",
        "Anyone holding the viewing key can link your stealth addresses.".dimmed()
    );

    Ok(())
}

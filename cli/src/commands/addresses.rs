//! Print the address set a lookup currently selects from

use anyhow::{Context, Result};
use colored::Colorize;

use stealth::{encode_hex, AddressMapper, SignatureOracle};

use crate::config::ResolverConfig;

pub fn run(config: &ResolverConfig) -> Result<()> {
    let signer = config.signer()?;
    let resolver = config.resolver();
    let message = resolver.challenge(&signer.address())?;
    let signature = signer
        .sign(message.as_bytes())
        .context("Failed to sign the challenge message")?;
    let addresses = resolver.addresses(&signature)?;

    println!();
    println!(
        "{} ({} on chain {}, {} selection)",
        "Stealth Addresses".yellow().bold(),
        addresses.len(),
        config.params.chain_id,
        config.params.selection
    );
    println!();

    for stealth in &addresses {
        println!("{} {}", format!("[{}]", stealth.nonce).cyan(), stealth.address);
        if let Some(mapper) = &config.smart_account {
            let account = mapper.map(&stealth.address);
            println!("    Smart account: {}", account);
            println!("    Payload:       {}", encode_hex(&account).dimmed());
        } else {
            println!("    Payload:       {}", encode_hex(&stealth.address).dimmed());
        }
        println!(
            "    Ephemeral key: {}",
            hex::encode(stealth.ephemeral_pubkey.serialize()).dimmed()
        );
    }
    println!();

    Ok(())
}

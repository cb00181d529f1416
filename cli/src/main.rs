//! stealth-resolver - CCIP-Read gateway answering ENS lookups with stealth addresses

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod config;
mod server;

use commands::*;
use config::{ConfigArgs, ResolverConfig};

#[derive(Parser)]
#[command(name = "stealth-resolver")]
#[command(version = "0.1.0")]
#[command(about = "CCIP-Read resolver that returns a fresh stealth address per lookup")]
#[command(long_about = r#"
stealth-resolver answers ENS offchain lookups with one-time stealth
addresses derived from a single wallet signature.

The wallet signs a fixed challenge (address + PIN). The signature is split
into spending and viewing keys, the viewing key seeds an HD node, and every
nonce of that node blinds the spending key into a new address.

Quick Start:
  1. stealth-resolver meta-address   Show the keys behind the addresses
  2. stealth-resolver addresses      List the current address set
  3. stealth-resolver serve          Run the CCIP-Read endpoint
"#)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON config file; flags and environment variables take precedence
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(flatten)]
    settings: ConfigArgs,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the CCIP-Read HTTP endpoint
    Serve,

    /// Print every stealth address a lookup can currently return
    Addresses,

    /// Show the stealth meta-address (spending + viewing public keys)
    MetaAddress,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = ResolverConfig::load(cli.config.as_deref(), cli.settings)?;

    match cli.command {
        Commands::Serve => {
            serve::run(config).await?;
        }
        Commands::Addresses => {
            addresses::run(&config)?;
        }
        Commands::MetaAddress => {
            meta_address::run(&config)?;
        }
    }

    Ok(())
}

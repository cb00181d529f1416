//! Run the CCIP-Read endpoint

use std::sync::Arc;

use anyhow::Result;
use colored::Colorize;
use log::info;

use stealth::SignatureOracle;

use crate::config::ResolverConfig;
use crate::server::{ResolverServer, ResolverState};

pub async fn run(config: ResolverConfig) -> Result<()> {
    let signer = config.signer()?;

    println!();
    println!("{}", "Stealth Resolver".yellow().bold());
    println!("  Signer:    {}", signer.address());
    println!("  Chain id:  {}", config.params.chain_id);
    println!("  Addresses: {}", config.params.address_count);
    println!("  Selection: {}", config.params.selection);
    if let Some(mapper) = &config.smart_account {
        println!("  Smart account factory: {}", mapper.factory);
    }
    println!();

    info!("{:?}", config);

    let state = ResolverState::new(
        config.resolver(),
        Arc::new(signer),
        config.signing_timeout,
    );
    ResolverServer::new(config.port, state).run().await
}

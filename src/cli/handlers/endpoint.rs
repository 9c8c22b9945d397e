// src/cli/handlers/endpoint.rs

//! `endpoint`: resolves and stores the webhook endpoint.

use anyhow::Result;
use clap::Parser;
use colored::*;

use crate::{
    cli::args::EndpointArgs,
    core::endpoint::EndpointResolver,
    state::AppContext,
};

/// Resolves an endpoint and stores it in `app.json`.
pub fn handle(args: Vec<String>, ctx: &AppContext) -> Result<()> {
    let endpoint_args = EndpointArgs::try_parse_from(&args)?;
    let resolver = EndpointResolver::new(ctx.home()).with_port(endpoint_args.port);

    match ctx
        .config_store()
        .update_endpoint(Some(endpoint_args.kind.as_str()), &resolver)?
    {
        Some(url) => println!("  {} endpoint: {}", "✓".green(), url.cyan()),
        None => println!("  {}", "No endpoint set.".dimmed()),
    }
    Ok(())
}

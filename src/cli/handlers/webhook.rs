// src/cli/handlers/webhook.rs

//! `webhook`: prints the user's hosted webhook URL.

use anyhow::Result;
use clap::Parser;
use colored::*;

use crate::{constants::WEBHOOK_BASE_URL, state::AppContext};

#[derive(Parser, Debug, Default)]
#[command(no_binary_name = true, about = "Prints your hosted webhook URL, creating your id on first use.")]
struct WebhookArgs {}

/// Prints the user's webhook URL, creating the identity on first use.
pub fn handle(args: Vec<String>, ctx: &AppContext) -> Result<()> {
    WebhookArgs::try_parse_from(&args)?;

    let uuid = ctx.identity().get_or_create()?;
    println!("{}/{}", WEBHOOK_BASE_URL, uuid.to_string().cyan());
    Ok(())
}

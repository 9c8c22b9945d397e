// src/cli/handlers/locales.rs

//! `locales`: lists the locales with a model file.

use anyhow::Result;
use clap::Parser;
use colored::*;

use crate::{cli::handlers::commons, state::AppContext};

#[derive(Parser, Debug, Default)]
#[command(no_binary_name = true, about = "Lists the locales found in models/.")]
struct LocalesArgs {}

/// Prints every known locale, marking those whose model is missing.
pub fn handle(args: Vec<String>, ctx: &AppContext) -> Result<()> {
    LocalesArgs::try_parse_from(&args)?;

    let store = ctx.model_store();
    for locale in commons::locales(ctx, None)? {
        if store.load(&locale).is_ok() {
            println!("  {}", locale.cyan());
        } else {
            println!("  {} {}", locale.cyan(), "(no model file)".dimmed());
        }
    }
    Ok(())
}

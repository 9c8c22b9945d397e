// src/cli/handlers/config.rs

//! `config`: prints the stage-merged configuration or one value of it.

use anyhow::{Result, anyhow};
use clap::Parser;
use colored::*;
use serde_json::Value;

use crate::{
    cli::args::ConfigArgs,
    core::project::{self, ProjectPlatform},
    state::AppContext,
    system::json_file,
};

/// Prints one configuration value, or a summary of the whole configuration.
pub fn handle(args: Vec<String>, ctx: &AppContext) -> Result<()> {
    let config_args = ConfigArgs::try_parse_from(&args)?;
    let store = ctx.config_store();
    let stage = config_args.stage.as_deref();

    if let Some(path) = config_args.path {
        return match store.get_parameter(&path, stage)? {
            Some(Value::String(s)) => {
                println!("{}", s);
                Ok(())
            }
            Some(value) => {
                println!("{}", json_file::to_pretty_string(&value)?);
                Ok(())
            }
            None => Err(anyhow!("'{}' is not set.", path)),
        };
    }

    let config = store.load(stage)?;
    let platforms = project::project_platforms(ctx.paths(), config.as_ref());
    let names: Vec<String> = platforms.iter().map(ToString::to_string).collect();

    println!(
        "  {:<12} {}",
        "Platform:".blue(),
        ProjectPlatform::from_config(config.as_ref())
    );
    if !names.is_empty() {
        println!("  {:<12} {}", "Detected:".blue(), names.join(", "));
    }
    match config {
        Some(config) => println!("{}", json_file::to_pretty_string(&config)?),
        None => println!("  {}", "No app.json found.".dimmed()),
    }
    Ok(())
}

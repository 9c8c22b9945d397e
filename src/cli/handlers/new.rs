// src/cli/handlers/new.rs

//! `new`: scaffolds a project folder with a configuration and a first model.

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use colored::*;
use serde_json::{Map, json};

use crate::{
    cli::args::NewArgs,
    core::{
        model_store::ModelStore,
        paths::ProjectPaths,
        platform::{BuiltinDefaults, Platform},
        project,
    },
    state::AppContext,
};

/// Creates `<name>` below the current directory.
///
/// Fails when the folder exists, unless `--overwrite` is given, and when the
/// name is anything but a single folder name.
pub fn handle(args: Vec<String>, ctx: &AppContext) -> Result<()> {
    let new_args = NewArgs::try_parse_from(&args)?;
    let platform = new_args
        .platform
        .as_deref()
        .map(str::parse::<Platform>)
        .transpose()?;

    let parent = ctx.paths().root();
    let paths = ProjectPaths::for_new_project(parent, &new_args.name)?;

    if project::has_existing_project(parent, &new_args.name) {
        if !new_args.overwrite {
            return Err(anyhow!(
                "There is already a folder named '{}'. Use --overwrite to replace it.",
                new_args.name
            ));
        }
        println!("{}", format!("Replacing '{}'...", new_args.name).yellow());
        project::delete_project_dir(&paths)?;
    }

    project::create_project_dir(&paths)?;

    let config = ctx.config_store_for(&paths);
    config
        .update(Map::new())
        .context("Could not write app.json")?;

    let invocation = new_args
        .invocation
        .unwrap_or_else(|| paths.project_name());
    let models = ModelStore::new(&paths);
    models.save(
        &json!({ "invocation": invocation, "intents": [] }),
        &new_args.locale,
    )?;

    if let Some(platform) = platform {
        config.update_platform_defaults(platform)?;
        models.merge_platform_defaults(platform, &BuiltinDefaults)?;
    }

    println!("\n{}", "Success!".green().bold());
    println!("  {:<12} {}", "Project:".blue(), paths.root().display());
    println!("  {:<12} {}", "Locale:".blue(), new_args.locale);
    if let Some(platform) = platform {
        println!("  {:<12} {}", "Platform:".blue(), platform.to_string().cyan());
    }
    Ok(())
}

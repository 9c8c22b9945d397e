// src/cli/handlers/platform.rs

//! `platform`: enables a platform in the configuration and models.

use anyhow::Result;
use clap::Parser;
use colored::*;

use crate::{
    cli::{args::PlatformArgs, handlers::commons},
    core::platform::{BuiltinDefaults, Platform},
    state::AppContext,
};

/// Enables a platform: adds its block to `app.json` and its default intents
/// to every model.
pub fn handle(args: Vec<String>, ctx: &AppContext) -> Result<()> {
    let platform_args = PlatformArgs::try_parse_from(&args)?;
    let platform: Platform = platform_args.platform.parse()?;
    commons::ensure_project(ctx)?;

    if ctx.config_store().update_platform_defaults(platform)? {
        println!("  {} Added '{}' to app.json", "✓".green(), platform.to_string().cyan());
    } else {
        println!("  {}", format!("app.json already has '{}'", platform).dimmed());
    }

    ctx.model_store()
        .merge_platform_defaults(platform, &BuiltinDefaults)?;
    println!("  {} Merged default intents into the models", "✓".green());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{interpolator::Ambient, paths::ProjectPaths};
    use serde_json::json;
    use std::fs;

    #[test]
    fn test_add_google_action() {
        let dir = tempfile::tempdir().unwrap();
        let home = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("models")).unwrap();
        fs::write(dir.path().join("models/en-US.json"), r#"{ "intents": [] }"#).unwrap();

        let ctx = AppContext::new(ProjectPaths::new(dir.path()), home.path(), Ambient::default());
        handle(vec!["googleAction".into()], &ctx).unwrap();

        let config = ctx.config_store().load_raw().unwrap().unwrap();
        assert_eq!(config["googleAction"], json!({ "nlu": { "name": "dialogflow" } }));
        let model = ctx.model_store().load("en-US").unwrap();
        assert_eq!(model["dialogflow"]["intents"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_unknown_platform() {
        let dir = tempfile::tempdir().unwrap();
        let home = tempfile::tempdir().unwrap();
        let ctx = AppContext::new(ProjectPaths::new(dir.path()), home.path(), Ambient::default());
        assert!(handle(vec!["cortana".into()], &ctx).is_err());
    }
}

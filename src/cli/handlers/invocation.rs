// src/cli/handlers/invocation.rs

//! `invocation`: sets the invocation name of one or all models.

use anyhow::Result;
use clap::Parser;
use colored::*;

use crate::{
    cli::{args::InvocationArgs, handlers::commons},
    state::AppContext,
};

/// Sets the invocation name in the selected models.
pub fn handle(args: Vec<String>, ctx: &AppContext) -> Result<()> {
    let invocation_args = InvocationArgs::try_parse_from(&args)?;
    commons::ensure_project(ctx)?;

    let store = ctx.model_store();
    for locale in commons::locales(ctx, invocation_args.locale.as_deref())? {
        store.update_invocation(&invocation_args.invocation, &locale)?;
        println!(
            "  {} {}: invocation set to '{}'",
            "✓".green(),
            locale,
            invocation_args.invocation.cyan()
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{interpolator::Ambient, paths::ProjectPaths};
    use serde_json::json;
    use std::fs;

    #[test]
    fn test_sets_invocation() {
        let dir = tempfile::tempdir().unwrap();
        let home = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("models")).unwrap();
        fs::write(dir.path().join("models/en-US.json"), r#"{ "intents": [] }"#).unwrap();

        let ctx = AppContext::new(ProjectPaths::new(dir.path()), home.path(), Ambient::default());
        handle(vec!["my helper".into()], &ctx).unwrap();

        let model = ctx.model_store().load("en-US").unwrap();
        assert_eq!(model["invocation"], json!("my helper"));
    }
}

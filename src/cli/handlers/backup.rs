// src/cli/handlers/backup.rs

//! `backup`: copies models to dated backup files.

use anyhow::{Context, Result};
use clap::Parser;
use colored::*;

use crate::{
    cli::{args::LocaleArgs, handlers::commons},
    state::AppContext,
};

/// Backs up the models of `--locale`, or all of them.
pub fn handle(args: Vec<String>, ctx: &AppContext) -> Result<()> {
    let locale_args = LocaleArgs::try_parse_from(&args)?;
    commons::ensure_project(ctx)?;

    let store = ctx.model_store();
    for locale in commons::locales(ctx, locale_args.locale.as_deref())? {
        let target = store
            .backup(&locale)
            .with_context(|| format!("Backup of locale '{}' failed", locale))?;
        println!("  {} {} -> {}", "✓".green(), locale, target.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{interpolator::Ambient, paths::ProjectPaths};
    use std::fs;

    #[test]
    fn test_backup_every_locale() {
        let dir = tempfile::tempdir().unwrap();
        let home = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("models")).unwrap();
        fs::write(dir.path().join("models/en-US.json"), r#"{ "intents": [] }"#).unwrap();

        let ctx = AppContext::new(ProjectPaths::new(dir.path()), home.path(), Ambient::default());
        handle(vec![], &ctx).unwrap();

        let backups = fs::read_dir(dir.path().join("models"))
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().starts_with("en-US2"))
            .count();
        assert_eq!(backups, 1);
    }
}

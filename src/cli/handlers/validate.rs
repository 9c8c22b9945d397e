// src/cli/handlers/validate.rs

//! `validate`: checks models against the language-model rules.

use anyhow::{Result, anyhow};
use clap::Parser;
use colored::*;

use crate::{
    cli::{args::LocaleArgs, handlers::commons},
    state::AppContext,
};

/// Validates each model and fails if any of them is invalid.
pub fn handle(args: Vec<String>, ctx: &AppContext) -> Result<()> {
    let locale_args = LocaleArgs::try_parse_from(&args)?;
    commons::ensure_project(ctx)?;

    let store = ctx.model_store();
    let mut failures = 0usize;
    for locale in commons::locales(ctx, locale_args.locale.as_deref())? {
        match store.validate(&locale) {
            Ok(()) => println!("  {} {}", "✓".green(), locale),
            Err(e) => {
                failures += 1;
                println!("  {} {}: {}", "✗".red(), locale, e);
            }
        }
    }

    if failures > 0 {
        return Err(anyhow!("{} model(s) failed validation.", failures));
    }
    println!("\n{}", "All models are valid.".green().bold());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{interpolator::Ambient, paths::ProjectPaths};
    use std::fs;

    fn context(dir: &std::path::Path, home: &std::path::Path) -> AppContext {
        AppContext::new(ProjectPaths::new(dir), home, Ambient::default())
    }

    #[test]
    fn test_validate_reports_failures() {
        let dir = tempfile::tempdir().unwrap();
        let home = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("models")).unwrap();
        fs::write(
            dir.path().join("models/en-US.json"),
            r#"{ "intents": [{ "name": "Hi", "phrases": ["hi"] }] }"#,
        )
        .unwrap();
        fs::write(
            dir.path().join("models/de-DE.json"),
            r#"{ "intents": [{ "name": "Hallo", "phrases": ["hallo {name}"] }] }"#,
        )
        .unwrap();

        let ctx = context(dir.path(), home.path());
        assert!(handle(vec![], &ctx).is_err());
        assert!(handle(vec!["--locale".into(), "en-US".into()], &ctx).is_ok());
    }
}

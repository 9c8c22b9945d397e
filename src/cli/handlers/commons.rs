// src/cli/handlers/commons.rs

//! Helpers shared by several handlers.

// Helpers shared by several handlers.

use anyhow::{Result, anyhow};

use crate::{core::project, state::AppContext};

/// Fails unless the context points at a project: a scaffolded app folder or
/// at least a `models/` directory.
pub fn ensure_project(ctx: &AppContext) -> Result<()> {
    let paths = ctx.paths();
    if project::is_project_directory(paths) || paths.models_dir().is_dir() {
        return Ok(());
    }
    Err(anyhow!(
        "'{}' is not a voice app project. Run this command in a project folder or pass --project.",
        paths.root().display()
    ))
}

/// Resolves the locales a command should touch.
pub fn locales(ctx: &AppContext, explicit: Option<&str>) -> Result<Vec<String>> {
    Ok(ctx.model_store().list_locales(explicit)?)
}

// src/state.rs

//! Per-invocation application context.

use crate::core::config_store::ConfigStore;
use crate::core::interpolator::Ambient;
use crate::core::model_store::ModelStore;
use crate::core::paths::{self, ProjectPaths};
use crate::core::webhook::WebhookIdentityStore;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Everything a command needs to know about where it runs.
///
/// Built once per invocation and passed to handlers explicitly; there is no
/// process-wide "current project".
#[derive(Debug, Clone)]
pub struct AppContext {
    paths: ProjectPaths,
    home: PathBuf,
    ambient: Ambient,
    identity: WebhookIdentityStore,
}

impl AppContext {
    /// Context for the project at `project`, or the working directory.
    pub fn from_env(project: Option<PathBuf>) -> Result<Self> {
        let root = match project {
            Some(dir) => dir,
            None => std::env::current_dir().context("Could not determine the working directory")?,
        };
        let home = paths::user_home()?;
        Ok(Self::new(ProjectPaths::new(root), &home, Ambient::from_env()))
    }

    /// Context with explicit paths, home directory and environment.
    pub fn new(paths: ProjectPaths, home: &Path, ambient: Ambient) -> Self {
        Self {
            paths,
            home: home.to_path_buf(),
            ambient,
            identity: WebhookIdentityStore::for_home(home),
        }
    }

    /// Paths of the current project.
    pub fn paths(&self) -> &ProjectPaths {
        &self.paths
    }

    /// The user's home directory.
    pub fn home(&self) -> &Path {
        &self.home
    }

    /// Environment snapshot taken at startup.
    pub fn ambient(&self) -> &Ambient {
        &self.ambient
    }

    /// The user's webhook identity store.
    pub fn identity(&self) -> &WebhookIdentityStore {
        &self.identity
    }

    /// Config store for the current project, with `${WEBHOOK_URL}` enabled.
    pub fn config_store(&self) -> ConfigStore<'_> {
        self.config_store_for(&self.paths)
    }

    /// Config store for another project root, e.g. one being created.
    pub fn config_store_for<'a>(&'a self, paths: &'a ProjectPaths) -> ConfigStore<'a> {
        ConfigStore::new(paths, &self.ambient).with_webhook(&self.identity)
    }

    /// Model store for the current project.
    pub fn model_store(&self) -> ModelStore<'_> {
        ModelStore::new(&self.paths)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;

    #[test]
    fn test_stores_share_project_root() {
        let project = tempfile::tempdir().unwrap();
        let home = tempfile::tempdir().unwrap();
        fs::write(project.path().join("app.json"), r#"{ "endpoint": "${WEBHOOK_URL}" }"#).unwrap();

        let ctx = AppContext::new(ProjectPaths::new(project.path()), home.path(), Ambient::default());
        let endpoint = ctx.config_store().get_parameter("endpoint", None).unwrap();

        let uuid = ctx.identity().current().unwrap();
        assert_eq!(endpoint, Some(json!(format!("https://webhook.voxa.cloud/{}", uuid))));
        assert_eq!(ctx.model_store().list_locales(None).unwrap(), vec!["en-US"]);
    }
}

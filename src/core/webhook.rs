// src/core/webhook.rs

//! # Webhook Identity
//!
//! Every user gets one UUID that addresses their hosted webhook relay. It lives
//! at `webhook.uuid` in `~/.voxa/config`, is generated lazily on first use and
//! is returned unchanged afterwards.
//!
//! There is no file locking: two processes creating the identity for the first
//! time at the same moment may each write a different UUID, and the last
//! writer wins. That is acceptable for a single-user CLI.

use crate::core::{json_path, paths};
use crate::system::json_file::{self, JsonFileError};
use serde_json::{Value, json};
use std::{
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error;
use uuid::Uuid;

const UUID_PATH: &str = "webhook.uuid";

/// Errors raised while persisting the webhook identity.
#[derive(Error, Debug)]
pub enum IdentityError {
    /// `~/.voxa` could not be created.
    #[error("Could not create directory '{path}': {source}")]
    DirCreation {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The user config file could not be written.
    #[error("Could not save webhook identity: {0}")]
    Write(#[from] JsonFileError),
}

/// Persistent, per-user webhook identity.
#[derive(Debug, Clone)]
pub struct WebhookIdentityStore {
    config_file: PathBuf,
}

impl WebhookIdentityStore {
    /// Store backed by `config_file`.
    pub fn new(config_file: impl Into<PathBuf>) -> Self {
        Self {
            config_file: config_file.into(),
        }
    }

    /// The store rooted at `<home>/.voxa/config`.
    pub fn for_home(home: &Path) -> Self {
        Self::new(paths::user_config_file(home))
    }

    /// The backing file.
    pub fn config_file(&self) -> &Path {
        &self.config_file
    }

    /// Returns the stored UUID without creating one.
    pub fn current(&self) -> Option<Uuid> {
        let config = self.load_config()?;
        stored_uuid(&config)
    }

    /// Returns the user's webhook UUID, generating and persisting a new
    /// version 4 UUID if none is stored yet.
    ///
    /// An unreadable or malformed config file counts as "no UUID stored" and
    /// is replaced. A stored value that is not a valid UUID is replaced too.
    /// Other keys in a readable config file are preserved.
    pub fn get_or_create(&self) -> Result<Uuid, IdentityError> {
        let mut config = self.load_config().unwrap_or_else(|| json!({}));
        if let Some(uuid) = stored_uuid(&config) {
            return Ok(uuid);
        }

        if json_path::is_truthy(json_path::get(&config, UUID_PATH)) {
            log::warn!(
                "Ignoring malformed webhook id in '{}'.",
                self.config_file.display()
            );
        }

        let uuid = Uuid::new_v4();
        json_path::set(&mut config, UUID_PATH, Value::String(uuid.to_string()));
        self.save_config(&config)?;
        log::info!("Created webhook id {}", uuid);

        Ok(uuid)
    }

    fn load_config(&self) -> Option<Value> {
        match json_file::read_json::<Value>(&self.config_file) {
            Ok(config) if config.is_object() => Some(config),
            Ok(_) => None,
            Err(JsonFileError::NotFound { .. }) => None,
            Err(e) => {
                log::debug!("Could not read user config: {}", e);
                None
            }
        }
    }

    fn save_config(&self, config: &Value) -> Result<(), IdentityError> {
        if let Some(dir) = self.config_file.parent()
            && !dir.exists()
        {
            fs::create_dir_all(dir).map_err(|source| IdentityError::DirCreation {
                path: dir.to_path_buf(),
                source,
            })?;
        }
        json_file::write_json(&self.config_file, config)?;
        Ok(())
    }
}

fn stored_uuid(config: &Value) -> Option<Uuid> {
    json_path::get(config, UUID_PATH)
        .and_then(Value::as_str)
        .and_then(|s| Uuid::parse_str(s).ok())
}

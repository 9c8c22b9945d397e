// src/core/config_store.rs

//! # Project Configuration
//!
//! Reads and updates `app.json`. A loaded configuration is the on-disk
//! document with the active stage's overrides merged onto it: objects are
//! merged key by key, arrays and scalars from the stage replace the base.
//!
//! A missing configuration file is a normal state (`Ok(None)`); a malformed
//! one is an error.

use crate::constants::STAGE_ENV_VAR;
use crate::core::endpoint::{EndpointError, EndpointKind, ResolveEndpoint};
use crate::core::interpolator::{Ambient, InterpolationError, Interpolator};
use crate::core::json_path;
use crate::core::paths::ProjectPaths;
use crate::core::platform::Platform;
use crate::core::webhook::WebhookIdentityStore;
use crate::system::json_file::{self, JsonFileError};
use serde_json::{Map, Value};
use std::path::PathBuf;
use thiserror::Error;

const DEFAULT_STAGE_KEY: &str = "defaultStage";
const STAGES_KEY: &str = "stages";
const ENDPOINT_KEY: &str = "endpoint";

/// Errors raised while reading or updating `app.json`.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file exists but is not valid JSON.
    #[error("Project configuration '{path}' is not valid JSON: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// The file exists but could not be read.
    #[error("Could not read project configuration '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The document is valid JSON but not an object, so it cannot be extended.
    #[error("Project configuration '{path}' must be a JSON object.")]
    NotAnObject { path: PathBuf },
    /// Writing the updated document failed.
    #[error("Could not save project configuration: {0}")]
    Write(JsonFileError),
    /// A `${...}` placeholder in a value could not be expanded.
    #[error("Could not resolve configuration value: {0}")]
    Interpolation(#[from] InterpolationError),
    /// The requested endpoint could not be resolved.
    #[error(transparent)]
    Endpoint(#[from] EndpointError),
}

impl From<JsonFileError> for ConfigError {
    fn from(err: JsonFileError) -> Self {
        match err {
            JsonFileError::Io { path, source } => ConfigError::Io { path, source },
            JsonFileError::Parse { path, source } => ConfigError::Parse { path, source },
            other => ConfigError::Write(other),
        }
    }
}

/// Access to a project's `app.json`.
#[derive(Debug, Clone, Copy)]
pub struct ConfigStore<'a> {
    paths: &'a ProjectPaths,
    ambient: &'a Ambient,
    webhook: Option<&'a WebhookIdentityStore>,
}

impl<'a> ConfigStore<'a> {
    /// Store for the `app.json` of `paths`, resolving placeholders against `ambient`.
    pub fn new(paths: &'a ProjectPaths, ambient: &'a Ambient) -> Self {
        Self {
            paths,
            ambient,
            webhook: None,
        }
    }

    /// Lets `${WEBHOOK_URL}` placeholders in configuration values resolve.
    pub fn with_webhook(mut self, store: &'a WebhookIdentityStore) -> Self {
        self.webhook = Some(store);
        self
    }

    /// Loads the configuration with the active stage merged in.
    ///
    /// The active stage is `stage` if given, otherwise the `STAGE` variable
    /// of the ambient environment, otherwise the document's `defaultStage`
    /// (placeholders resolved). Stage names without a `stages` entry leave
    /// the document unchanged.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` when the file is not valid JSON and
    /// `ConfigError::Io` when it exists but cannot be read.
    pub fn load(&self, stage: Option<&str>) -> Result<Option<Value>, ConfigError> {
        let Some(mut config) = self.load_raw()? else {
            return Ok(None);
        };

        if let Some(stage) = self.active_stage(&config, stage) {
            let overrides = config
                .get(STAGES_KEY)
                .and_then(|stages| stages.get(&stage))
                .cloned();
            if let Some(overrides) = overrides {
                log::debug!("Applying configuration stage '{}'", stage);
                deep_merge(&mut config, &overrides);
            }
        }

        Ok(Some(config))
    }

    /// Returns the on-disk document without stage resolution.
    pub fn load_raw(&self) -> Result<Option<Value>, ConfigError> {
        match json_file::read_json::<Value>(&self.paths.config_file()) {
            Ok(config) => Ok(Some(config)),
            Err(JsonFileError::NotFound { .. }) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// `true` when `app.json` exists and parses.
    pub fn exists(&self) -> bool {
        matches!(self.load_raw(), Ok(Some(_)))
    }

    /// Looks up a dotted path in the stage-merged configuration.
    ///
    /// `null` and absent values give `None`. String values have their
    /// placeholders expanded.
    pub fn get_parameter(
        &self,
        path: &str,
        stage: Option<&str>,
    ) -> Result<Option<Value>, ConfigError> {
        let Some(config) = self.load(stage)? else {
            return Ok(None);
        };

        match json_path::get(&config, path) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(template)) => {
                let expanded = self.interpolator().expand_string(template)?;
                Ok(Some(Value::String(expanded)))
            }
            Some(value) => Ok(Some(value.clone())),
        }
    }

    /// Shallow-merges `partial` into the on-disk document and saves it.
    /// A missing file starts from an empty object.
    pub fn update(&self, partial: Map<String, Value>) -> Result<(), ConfigError> {
        let path = self.paths.config_file();
        let mut config = self.load_raw()?.unwrap_or_else(|| Value::Object(Map::new()));
        let Some(object) = config.as_object_mut() else {
            return Err(ConfigError::NotAnObject { path });
        };

        object.extend(partial);
        json_file::write_json(&path, &config).map_err(ConfigError::Write)?;
        log::debug!("Updated {}", path.display());
        Ok(())
    }

    /// Adds the platform's settings block when the configuration lacks one.
    /// Returns whether anything was written.
    pub fn update_platform_defaults(&self, platform: Platform) -> Result<bool, ConfigError> {
        let key = platform.config_key();
        let present = self
            .load_raw()?
            .is_some_and(|config| json_path::is_truthy(config.get(key)));
        if present {
            return Ok(false);
        }

        let mut partial = Map::new();
        partial.insert(key.to_string(), platform.default_config_block());
        self.update(partial)?;
        log::info!("Added {} settings to {}", key, self.paths.config_file().display());
        Ok(true)
    }

    /// Resolves an endpoint of the given kind and stores it as `endpoint`.
    /// No kind, an empty kind and `none` leave the configuration alone.
    pub fn update_endpoint(
        &self,
        kind: Option<&str>,
        resolver: &dyn ResolveEndpoint,
    ) -> Result<Option<String>, ConfigError> {
        let Some(kind) = kind.filter(|k| !k.is_empty()) else {
            return Ok(None);
        };
        let kind: EndpointKind = kind.parse()?;
        if kind == EndpointKind::None {
            return Ok(None);
        }

        let url = resolver.resolve(kind)?;
        let mut partial = Map::new();
        partial.insert(ENDPOINT_KEY.to_string(), Value::String(url.clone()));
        self.update(partial)?;
        Ok(Some(url))
    }

    fn interpolator(&self) -> Interpolator<'a> {
        let interpolator = Interpolator::new(self.ambient);
        match self.webhook {
            Some(store) => interpolator.with_webhook(store),
            None => interpolator,
        }
    }

    fn active_stage(&self, config: &Value, explicit: Option<&str>) -> Option<String> {
        if let Some(stage) = explicit.filter(|s| !s.is_empty()) {
            return Some(stage.to_string());
        }
        if let Some(stage) = self.ambient.var(STAGE_ENV_VAR).filter(|s| !s.is_empty()) {
            return Some(stage.to_string());
        }

        let template = config.get(DEFAULT_STAGE_KEY)?.as_str()?;
        match self.interpolator().expand_string(template) {
            Ok(stage) if !stage.is_empty() => Some(stage),
            Ok(_) => None,
            Err(e) => {
                log::warn!("Ignoring defaultStage '{}': {}", template, e);
                None
            }
        }
    }
}

/// Merges `overlay` onto `base`. Objects merge recursively; any other value
/// in `overlay` replaces the one in `base`.
pub fn deep_merge(base: &mut Value, overlay: &Value) {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            for (key, value) in overlay_map {
                match base_map.get_mut(key) {
                    Some(existing) => deep_merge(existing, value),
                    None => {
                        base_map.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        (base, overlay) => *base = overlay.clone(),
    }
}

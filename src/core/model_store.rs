// src/core/model_store.rs

//! # Model Store
//!
//! Loads, saves and edits the per-locale language model files in
//! `<project>/models/`. Documents are kept as `serde_json::Value` so keys this
//! tool does not know about survive a load/save cycle.

use crate::constants::{DEFAULT_LOCALE, JSON_EXTENSION};
use crate::core::json_path;
use crate::core::paths::ProjectPaths;
use crate::core::platform::{DefaultIntents, NativeLayout, Platform};
use crate::core::validator::{self, ValidationError};
use crate::system::json_file::{self, JsonFileError};
use chrono::{NaiveDate, Utc};
use serde_json::Value;
use std::collections::HashSet;
use std::{fs, io::ErrorKind, path::PathBuf};
use thiserror::Error;

/// Errors raised by [`ModelStore`].
#[derive(Error, Debug)]
pub enum ModelError {
    /// The locale has no model file.
    #[error("Could not find model file for locale '{locale}'")]
    NotFound { locale: String },
    /// The model file is not valid JSON.
    #[error("Model file for locale '{locale}' is not valid JSON: {source}")]
    Parse {
        locale: String,
        #[source]
        source: serde_json::Error,
    },
    /// The model failed validation.
    #[error("Invalid model for locale '{locale}': {source}")]
    Validation {
        locale: String,
        #[source]
        source: ValidationError,
    },
    /// A filesystem operation on the models directory failed.
    #[error("Filesystem error at '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Writing a model or backup failed.
    #[error("Could not write model file: {0}")]
    Write(#[from] JsonFileError),
}

type ModelResult<T> = Result<T, ModelError>;

/// Access to the language model files of one project.
#[derive(Debug, Clone)]
pub struct ModelStore<'a> {
    paths: &'a ProjectPaths,
}

impl<'a> ModelStore<'a> {
    /// Store for the models of the project at `paths`.
    pub fn new(paths: &'a ProjectPaths) -> Self {
        Self { paths }
    }

    /// Reads and parses `<models>/<locale>.json`.
    ///
    /// # Errors
    /// `ModelError::NotFound` if the file does not exist, `ModelError::Parse`
    /// if it is not valid JSON.
    pub fn load(&self, locale: &str) -> ModelResult<Value> {
        let path = self.paths.model_file(locale);
        json_file::read_json(&path).map_err(|e| match e {
            JsonFileError::NotFound { .. } => ModelError::NotFound {
                locale: locale.to_string(),
            },
            JsonFileError::Parse { source, .. } => ModelError::Parse {
                locale: locale.to_string(),
                source,
            },
            JsonFileError::Io { path, source } => ModelError::Io { path, source },
            other => ModelError::Write(other),
        })
    }

    /// Overwrites the locale's model file with `model`, creating the models
    /// directory if needed.
    pub fn save(&self, model: &Value, locale: &str) -> ModelResult<()> {
        let models_dir = self.paths.models_dir();
        if !models_dir.exists() {
            fs::create_dir_all(&models_dir).map_err(|source| ModelError::Io {
                path: models_dir.clone(),
                source,
            })?;
        }
        json_file::write_json(&self.paths.model_file(locale), model)?;
        log::debug!("Saved model for locale '{}'", locale);
        Ok(())
    }

    /// Writes a copy of the locale's model to `<models>/<locale><YYYY-MM-DD>.json`
    /// using today's UTC date. A backup from earlier the same day is overwritten.
    pub fn backup(&self, locale: &str) -> ModelResult<PathBuf> {
        self.backup_on(locale, Utc::now().date_naive())
    }

    /// [`ModelStore::backup`] with an explicit date.
    pub fn backup_on(&self, locale: &str, date: NaiveDate) -> ModelResult<PathBuf> {
        let model = self.load(locale)?;
        let target = self.paths.models_dir().join(format!(
            "{}{}.{}",
            locale,
            date.format("%Y-%m-%d"),
            JSON_EXTENSION
        ));
        json_file::write_json(&target, &model)?;
        log::info!("Backed up model '{}' to '{}'", locale, target.display());
        Ok(target)
    }

    /// Returns the locales to operate on.
    ///
    /// With an explicit locale, that locale alone. Otherwise the models
    /// directory is scanned in enumeration order: a 10-character file name
    /// (`en-US.json`) yields its first 5 characters, a 7-character one
    /// (`en.json`) its first 2. Everything else is ignored. An absent or empty
    /// directory yields the default locale.
    pub fn list_locales(&self, explicit: Option<&str>) -> ModelResult<Vec<String>> {
        if let Some(locale) = explicit {
            return Ok(vec![locale.to_string()]);
        }

        let models_dir = self.paths.models_dir();
        let entries = match fs::read_dir(&models_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Ok(vec![DEFAULT_LOCALE.to_string()]);
            }
            Err(source) => {
                return Err(ModelError::Io {
                    path: models_dir,
                    source,
                });
            }
        };

        let mut file_count = 0usize;
        let mut locales = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| ModelError::Io {
                path: models_dir.clone(),
                source,
            })?;
            file_count += 1;
            let file_name = entry.file_name().to_string_lossy().to_string();
            if let Some(locale) = locale_from_file_name(&file_name) {
                locales.push(locale);
            }
        }

        if file_count == 0 {
            return Ok(vec![DEFAULT_LOCALE.to_string()]);
        }
        Ok(locales)
    }

    /// True if the model of at least one of `locales` can be loaded.
    pub fn has_model_files(&self, locales: &[String]) -> bool {
        locales.iter().any(|locale| self.load(locale).is_ok())
    }

    /// Merges the platform's default intents into every locale's native section.
    ///
    /// All locales are loaded first; if any of them fails to load the whole
    /// operation is skipped and reported as success, without touching any file.
    /// Models are not backed up.
    pub fn merge_platform_defaults(
        &self,
        platform: Platform,
        defaults: &dyn DefaultIntents,
    ) -> ModelResult<()> {
        let locales = self.list_locales(None)?;

        let mut models = Vec::with_capacity(locales.len());
        for locale in locales {
            match self.load(&locale) {
                Ok(model) => models.push((locale, model)),
                Err(e) => {
                    log::debug!("Skipping default intents for {}: {}", platform, e);
                    return Ok(());
                }
            }
        }

        let default_intents = defaults.default_intents(platform);
        for (locale, mut model) in models {
            merge_default_intents(&mut model, platform.native_layout(), &default_intents);
            self.save(&model, &locale)?;
        }
        Ok(())
    }

    /// Sets the model's invocation phrase.
    pub fn update_invocation(&self, invocation: &str, locale: &str) -> ModelResult<()> {
        let mut model = self.load(locale)?;
        json_path::set(&mut model, "invocation", Value::String(invocation.to_string()));
        self.save(&model, locale)
    }

    /// Loads and validates the locale's model.
    pub fn validate(&self, locale: &str) -> ModelResult<()> {
        let model = self.load(locale)?;
        validator::validate_model(&model).map_err(|source| ModelError::Validation {
            locale: locale.to_string(),
            source,
        })
    }

    /// Renames the model file that is not `<locale>.json` to `<locale>.json`.
    ///
    /// Meant for freshly extracted templates holding a single model. If several
    /// candidates exist, the last one enumerated wins.
    pub fn rename_to_locale(&self, locale: &str) -> ModelResult<()> {
        let models_dir = self.paths.models_dir();
        let target = self.paths.model_file(locale);
        let io_err = |source| ModelError::Io {
            path: models_dir.clone(),
            source,
        };

        let mut candidate: Option<PathBuf> = None;
        for entry in fs::read_dir(&models_dir).map_err(io_err)? {
            let path = entry.map_err(io_err)?.path();
            if path != target {
                candidate = Some(path);
            }
        }

        if let Some(source_path) = candidate {
            fs::rename(&source_path, &target).map_err(|source| ModelError::Io {
                path: source_path.clone(),
                source,
            })?;
            log::info!(
                "Renamed '{}' to '{}'",
                source_path.display(),
                target.display()
            );
        }
        Ok(())
    }
}

fn locale_from_file_name(file_name: &str) -> Option<String> {
    match file_name.chars().count() {
        10 => Some(file_name.chars().take(5).collect()),
        7 => Some(file_name.chars().take(2).collect()),
        _ => None,
    }
}

/// Name-union of the model's native intents with `defaults`, then removal of
/// every native intent a model intent already maps to.
fn merge_default_intents(model: &mut Value, layout: &NativeLayout, defaults: &[Value]) {
    let intents_path = layout.intents_path_string();

    let mut merged: Vec<Value> = match json_path::get(model, &intents_path) {
        Some(Value::Array(existing)) => existing.clone(),
        _ => Vec::new(),
    };
    let mut seen: HashSet<String> = merged.iter().filter_map(intent_name).collect();
    for intent in defaults {
        match intent_name(intent) {
            Some(name) if seen.contains(&name) => {}
            Some(name) => {
                seen.insert(name);
                merged.push(intent.clone());
            }
            None => merged.push(intent.clone()),
        }
    }

    let mapped: HashSet<String> = model
        .get("intents")
        .and_then(Value::as_array)
        .map(|intents| {
            intents
                .iter()
                .filter_map(|i| i.get(layout.mapping_key))
                .filter_map(intent_name)
                .filter(|name| !name.is_empty())
                .collect()
        })
        .unwrap_or_default();
    merged.retain(|intent| intent_name(intent).is_none_or(|name| !mapped.contains(&name)));

    if merged.is_empty() {
        json_path::remove(model, &intents_path);
        prune_empty_parents(model, layout.intents_path);
    } else {
        json_path::set(model, &intents_path, Value::Array(merged));
    }
}

/// Removes now-empty objects along `path`, deepest first, up to and
/// including the native section itself.
fn prune_empty_parents(model: &mut Value, path: &[&str]) {
    for depth in (1..path.len()).rev() {
        let Some(prefix) = path.get(..depth) else {
            continue;
        };
        let prefix = prefix.join(".");
        let is_empty_object = matches!(
            json_path::get(model, &prefix),
            Some(Value::Object(map)) if map.is_empty()
        );
        if is_empty_object {
            json_path::remove(model, &prefix);
        } else {
            break;
        }
    }
}

fn intent_name(intent: &Value) -> Option<String> {
    intent.get("name").and_then(Value::as_str).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::platform::BuiltinDefaults;
    use serde_json::json;

    struct StopOnly;

    impl DefaultIntents for StopOnly {
        fn default_intents(&self, _platform: Platform) -> Vec<Value> {
            vec![json!({ "name": "Stop" })]
        }
    }

    fn project() -> (tempfile::TempDir, ProjectPaths) {
        let dir = tempfile::tempdir().unwrap();
        let paths = ProjectPaths::new(dir.path());
        (dir, paths)
    }

    fn sample_model() -> Value {
        json!({
            "invocation": "my test app",
            "intents": [
                { "name": "HelloWorldIntent", "phrases": ["hello"] }
            ]
        })
    }

    #[test]
    fn test_load_missing_is_not_found() {
        let (_dir, paths) = project();
        let err = ModelStore::new(&paths).load("de-DE").unwrap_err();
        assert!(matches!(err, ModelError::NotFound { locale } if locale == "de-DE"));
    }

    #[test]
    fn test_load_malformed_is_parse_error() {
        let (_dir, paths) = project();
        fs::create_dir_all(paths.models_dir()).unwrap();
        fs::write(paths.model_file("en-US"), "{ \"intents\": [").unwrap();

        let err = ModelStore::new(&paths).load("en-US").unwrap_err();
        assert!(matches!(err, ModelError::Parse { .. }));
    }

    #[test]
    fn test_save_then_load_is_identity() {
        let (_dir, paths) = project();
        let store = ModelStore::new(&paths);
        let model = sample_model();

        store.save(&model, "en-US").unwrap();
        let loaded = store.load("en-US").unwrap();
        store.save(&loaded, "en-US").unwrap();

        assert_eq!(store.load("en-US").unwrap(), model);
    }

    #[test]
    fn test_backup_writes_dated_copy() {
        let (_dir, paths) = project();
        let store = ModelStore::new(&paths);
        store.save(&sample_model(), "en-US").unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();

        let target = store.backup_on("en-US", date).unwrap();
        // Same day again: silently overwritten.
        store.backup_on("en-US", date).unwrap();

        assert_eq!(target, paths.models_dir().join("en-US2024-03-09.json"));
        let copy: Value = json_file::read_json(&target).unwrap();
        assert_eq!(copy, sample_model());
        assert!(paths.model_file("en-US").exists());
    }

    #[test]
    fn test_list_locales() {
        let (_dir, paths) = project();
        let store = ModelStore::new(&paths);

        assert_eq!(store.list_locales(None).unwrap(), vec!["en-US"]);
        assert_eq!(store.list_locales(Some("de-DE")).unwrap(), vec!["de-DE"]);

        fs::create_dir_all(paths.models_dir()).unwrap();
        assert_eq!(store.list_locales(None).unwrap(), vec!["en-US"]);

        store.save(&sample_model(), "en-US").unwrap();
        store.save(&sample_model(), "en").unwrap();
        store
            .backup_on("en-US", NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
            .unwrap();

        let mut locales = store.list_locales(None).unwrap();
        locales.sort();
        assert_eq!(locales, vec!["en", "en-US"]);
    }

    #[test]
    fn test_update_invocation() {
        let (_dir, paths) = project();
        let store = ModelStore::new(&paths);
        store.save(&sample_model(), "en-US").unwrap();

        store.update_invocation("hello world", "en-US").unwrap();
        assert_eq!(store.load("en-US").unwrap()["invocation"], json!("hello world"));

        assert!(matches!(
            store.update_invocation("x", "fr-FR"),
            Err(ModelError::NotFound { .. })
        ));
    }

    #[test]
    fn test_validate_wraps_violation() {
        let (_dir, paths) = project();
        let store = ModelStore::new(&paths);
        store
            .save(&json!({ "intents": [{ "name": "A", "phrases": ["{x}"] }] }), "en-US")
            .unwrap();

        assert!(matches!(
            store.validate("en-US"),
            Err(ModelError::Validation { locale, .. }) if locale == "en-US"
        ));
    }

    #[test]
    fn test_merge_into_model_without_native_section() {
        let (_dir, paths) = project();
        let store = ModelStore::new(&paths);
        store.save(&sample_model(), "en-US").unwrap();

        store
            .merge_platform_defaults(Platform::AlexaSkill, &StopOnly)
            .unwrap();

        let model = store.load("en-US").unwrap();
        assert_eq!(
            model["alexa"]["interactionModel"]["languageModel"]["intents"],
            json!([{ "name": "Stop" }])
        );
    }

    #[test]
    fn test_merge_excludes_mapped_intents() {
        let (_dir, paths) = project();
        let store = ModelStore::new(&paths);
        let model = json!({
            "invocation": "x",
            "intents": [
                { "name": "StopIntent", "phrases": ["stop"], "alexa": { "name": "Stop" } }
            ]
        });
        store.save(&model, "en-US").unwrap();

        store
            .merge_platform_defaults(Platform::AlexaSkill, &StopOnly)
            .unwrap();

        // Nothing left to merge: the native section is removed entirely.
        let merged = store.load("en-US").unwrap();
        assert_eq!(merged, model);
    }

    #[test]
    fn test_merge_keeps_existing_native_intents_first() {
        let (_dir, paths) = project();
        let store = ModelStore::new(&paths);
        let mut model = sample_model();
        model["alexa"] = json!({
            "interactionModel": {
                "languageModel": {
                    "invocationName": "x",
                    "intents": [{ "name": "AMAZON.HelpIntent", "samples": ["help me"] }]
                }
            }
        });
        store.save(&model, "en-US").unwrap();

        store
            .merge_platform_defaults(Platform::AlexaSkill, &BuiltinDefaults)
            .unwrap();

        let merged = store.load("en-US").unwrap();
        let intents = merged["alexa"]["interactionModel"]["languageModel"]["intents"]
            .as_array()
            .unwrap();
        let names: Vec<&str> = intents.iter().map(|i| i["name"].as_str().unwrap()).collect();
        assert_eq!(
            names,
            vec!["AMAZON.HelpIntent", "AMAZON.CancelIntent", "AMAZON.StopIntent"]
        );
        assert_eq!(intents[0]["samples"], json!(["help me"]));
    }

    #[test]
    fn test_merge_prunes_only_empty_parents() {
        let mut model = json!({
            "intents": [{ "name": "S", "phrases": [], "alexa": { "name": "Stop" } }],
            "alexa": { "interactionModel": { "languageModel": { "invocationName": "x" } } }
        });
        merge_default_intents(
            &mut model,
            Platform::AlexaSkill.native_layout(),
            &[json!({ "name": "Stop" })],
        );
        assert_eq!(
            model["alexa"],
            json!({ "interactionModel": { "languageModel": { "invocationName": "x" } } })
        );
    }

    #[test]
    fn test_merge_dialogflow_defaults() {
        let (_dir, paths) = project();
        let store = ModelStore::new(&paths);
        store.save(&sample_model(), "en-US").unwrap();

        store
            .merge_platform_defaults(Platform::GoogleAction, &BuiltinDefaults)
            .unwrap();

        let model = store.load("en-US").unwrap();
        assert_eq!(model["dialogflow"]["intents"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_merge_skips_everything_when_a_locale_fails() {
        let (_dir, paths) = project();
        let store = ModelStore::new(&paths);
        store.save(&sample_model(), "en-US").unwrap();
        fs::write(paths.model_file("de-DE"), "not json").unwrap();

        store
            .merge_platform_defaults(Platform::AlexaSkill, &StopOnly)
            .unwrap();

        assert_eq!(store.load("en-US").unwrap(), sample_model());
    }

    #[test]
    fn test_rename_to_locale() {
        let (_dir, paths) = project();
        let store = ModelStore::new(&paths);
        store.save(&sample_model(), "en-US").unwrap();

        store.rename_to_locale("de-DE").unwrap();

        assert!(paths.model_file("de-DE").exists());
        assert!(!paths.model_file("en-US").exists());
        assert!(store.has_model_files(&["de-DE".to_string()]));
        assert!(!store.has_model_files(&["en-US".to_string()]));
    }
}

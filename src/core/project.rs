// src/core/project.rs

//! Queries about the project on disk: whether a directory holds a project,
//! which platforms it targets, and creating or removing its folder.

use crate::core::json_path;
use crate::core::paths::ProjectPaths;
use crate::core::platform::Platform;
use crate::system::json_file;
use serde_json::Value;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while creating or removing a project folder.
#[derive(Error, Debug)]
pub enum ProjectError {
    /// The project folder could not be created.
    #[error("Could not create project directory '{path}': {source}")]
    Create {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The project folder could not be removed.
    #[error("Could not delete project directory '{path}': {source}")]
    Delete {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// The combination of platforms a project's configuration enables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectPlatform {
    /// No platform block.
    None,
    /// Only `alexaSkill`.
    AlexaSkill,
    /// Only `googleAction`.
    GoogleAction,
    /// Both platforms.
    All,
}

impl ProjectPlatform {
    /// Derived from the `alexaSkill` / `googleAction` blocks. A missing
    /// configuration enables nothing.
    pub fn from_config(config: Option<&Value>) -> Self {
        let enabled = |platform: Platform| {
            config.is_some_and(|c| json_path::is_truthy(c.get(platform.config_key())))
        };
        match (enabled(Platform::AlexaSkill), enabled(Platform::GoogleAction)) {
            (true, true) => Self::All,
            (true, false) => Self::AlexaSkill,
            (false, true) => Self::GoogleAction,
            (false, false) => Self::None,
        }
    }
}

impl fmt::Display for ProjectPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::None => "none",
            Self::AlexaSkill => Platform::AlexaSkill.config_key(),
            Self::GoogleAction => Platform::GoogleAction.config_key(),
            Self::All => "all",
        };
        f.write_str(name)
    }
}

/// A project directory has `index.js`, `package.json` and an `app/` folder.
pub fn is_project_directory(paths: &ProjectPaths) -> bool {
    paths.root().join("index.js").is_file()
        && paths.root().join("package.json").is_file()
        && paths.app_dir().is_dir()
}

/// `true` if something named `name` already exists under `parent`.
pub fn has_existing_project(parent: &Path, name: &str) -> bool {
    parent.join(name).exists()
}

/// Creates the project root (and any missing parents).
pub fn create_project_dir(paths: &ProjectPaths) -> Result<(), ProjectError> {
    if paths.root().exists() {
        return Ok(());
    }
    fs::create_dir_all(paths.root()).map_err(|source| ProjectError::Create {
        path: paths.root().to_path_buf(),
        source,
    })?;
    log::info!("Created project directory {}", paths.root().display());
    Ok(())
}

/// Removes the project root recursively. A missing directory is not an error.
pub fn delete_project_dir(paths: &ProjectPaths) -> Result<(), ProjectError> {
    if !paths.root().exists() {
        return Ok(());
    }
    fs::remove_dir_all(paths.root()).map_err(|source| ProjectError::Delete {
        path: paths.root().to_path_buf(),
        source,
    })?;
    log::info!("Deleted project directory {}", paths.root().display());
    Ok(())
}

/// Platforms the project targets, in `alexaSkill`, `googleAction` order.
///
/// With a configuration, its platform blocks decide. Without one, a platform
/// counts when its exported project file (`skill.json`, `agent.json`) parses.
pub fn project_platforms(paths: &ProjectPaths, config: Option<&Value>) -> Vec<Platform> {
    match config {
        Some(config) => Platform::ALL
            .into_iter()
            .filter(|p| json_path::is_truthy(config.get(p.config_key())))
            .collect(),
        None => Platform::ALL
            .into_iter()
            .filter(|p| {
                let file = match p {
                    Platform::AlexaSkill => paths.alexa_skill_file(),
                    Platform::GoogleAction => paths.dialogflow_agent_file(),
                };
                json_file::read_json::<Value>(&file).is_ok()
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_is_project_directory() {
        let dir = tempfile::tempdir().unwrap();
        let paths = ProjectPaths::new(dir.path());
        assert!(!is_project_directory(&paths));

        fs::write(dir.path().join("index.js"), "").unwrap();
        fs::write(dir.path().join("package.json"), "{}").unwrap();
        assert!(!is_project_directory(&paths));

        fs::create_dir(paths.app_dir()).unwrap();
        assert!(is_project_directory(&paths));
    }

    #[test]
    fn test_create_and_delete_project_dir() {
        let parent = tempfile::tempdir().unwrap();
        let paths = ProjectPaths::for_new_project(parent.path(), "hello").unwrap();
        assert!(!has_existing_project(parent.path(), "hello"));

        create_project_dir(&paths).unwrap();
        fs::create_dir_all(paths.models_dir()).unwrap();
        fs::write(paths.model_file("en-US"), "{}").unwrap();
        assert!(has_existing_project(parent.path(), "hello"));

        delete_project_dir(&paths).unwrap();
        assert!(!paths.root().exists());
        delete_project_dir(&paths).unwrap();
    }

    #[test]
    fn test_project_platform_from_config() {
        assert_eq!(ProjectPlatform::from_config(None), ProjectPlatform::None);
        assert_eq!(
            ProjectPlatform::from_config(Some(&json!({ "alexaSkill": { "nlu": "alexa" } }))),
            ProjectPlatform::AlexaSkill
        );
        assert_eq!(
            ProjectPlatform::from_config(Some(&json!({ "googleAction": {} }))),
            ProjectPlatform::GoogleAction
        );
        assert_eq!(
            ProjectPlatform::from_config(Some(&json!({ "alexaSkill": {}, "googleAction": {} }))),
            ProjectPlatform::All
        );
    }

    #[test]
    fn test_project_platforms_from_config() {
        let dir = tempfile::tempdir().unwrap();
        let paths = ProjectPaths::new(dir.path());
        let config = json!({ "googleAction": { "nlu": { "name": "dialogflow" } } });

        assert_eq!(
            project_platforms(&paths, Some(&config)),
            vec![Platform::GoogleAction]
        );
    }

    #[test]
    fn test_project_platforms_fallback_to_exports() {
        let dir = tempfile::tempdir().unwrap();
        let paths = ProjectPaths::new(dir.path());
        assert!(project_platforms(&paths, None).is_empty());

        let skill = paths.alexa_skill_file();
        fs::create_dir_all(skill.parent().unwrap()).unwrap();
        fs::write(&skill, r#"{ "manifest": {} }"#).unwrap();

        assert_eq!(project_platforms(&paths, None), vec![Platform::AlexaSkill]);
    }
}

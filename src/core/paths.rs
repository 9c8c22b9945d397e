// src/core/paths.rs

//! Locations of project and user files.

use crate::constants::{
    APP_DIR, I18N_DIR, JSON_EXTENSION, MODELS_DIR, PLATFORMS_DIR, PROJECT_CONFIG_FILENAME,
    USER_CONFIG_DIR, USER_CONFIG_FILENAME,
};
use lazy_static::lazy_static;
use std::path::{Component, Path, PathBuf};
use std::sync::Mutex;
use thiserror::Error;

lazy_static! {
    static ref USER_HOME_DIR: Mutex<Option<PathBuf>> = Mutex::new(None);
}

/// Errors raised while computing paths.
#[derive(Error, Debug)]
pub enum PathError {
    /// No home directory could be determined.
    #[error("Could not find the user's home directory.")]
    HomeDirNotFound,
    /// A new project name is not a single folder name.
    #[error("Invalid project name '{0}'. A project name must be a single folder name.")]
    InvalidProjectName(String),
}

/// Canonical on-disk locations of a single voice-app project.
///
/// All methods are pure path computations: nothing here touches the
/// filesystem, and a path that does not exist yet is not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectPaths {
    root: PathBuf,
}

impl ProjectPaths {
    /// Paths for the project rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root: PathBuf = root.into();
        Self {
            root: dunce::simplified(&root).to_path_buf(),
        }
    }

    /// Paths for a project named `name` that lives (or will live) directly
    /// under `parent`, typically the current working directory.
    ///
    /// # Errors
    ///
    /// `PathError::InvalidProjectName` unless `name` is exactly one normal
    /// path component, so the result can never point outside `parent`.
    pub fn for_new_project(parent: &Path, name: &str) -> Result<Self, PathError> {
        let mut components = Path::new(name).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => Ok(Self::new(parent.join(name))),
            _ => Err(PathError::InvalidProjectName(name.to_string())),
        }
    }

    /// The project root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The last component of the project root.
    pub fn project_name(&self) -> String {
        self.root
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default()
    }

    /// `<root>/models`
    pub fn models_dir(&self) -> PathBuf {
        self.root.join(MODELS_DIR)
    }

    /// `<models>/<locale>.json`
    pub fn model_file(&self, locale: &str) -> PathBuf {
        self.models_dir()
            .join(format!("{}.{}", locale, JSON_EXTENSION))
    }

    /// `<root>/app.json`
    pub fn config_file(&self) -> PathBuf {
        self.root.join(PROJECT_CONFIG_FILENAME)
    }

    /// `<root>/app`
    pub fn app_dir(&self) -> PathBuf {
        self.root.join(APP_DIR)
    }

    /// `<root>/app/i18n`
    pub fn i18n_dir(&self) -> PathBuf {
        self.app_dir().join(I18N_DIR)
    }

    /// `<root>/platforms`
    pub fn platforms_dir(&self) -> PathBuf {
        self.root.join(PLATFORMS_DIR)
    }

    /// The exported Alexa skill manifest.
    pub fn alexa_skill_file(&self) -> PathBuf {
        self.platforms_dir().join("alexaSkill").join("skill.json")
    }

    /// The exported Dialogflow agent descriptor.
    pub fn dialogflow_agent_file(&self) -> PathBuf {
        self.platforms_dir()
            .join("googleAction")
            .join("dialogflow")
            .join("agent.json")
    }
}

/// Returns the current user's home directory.
///
/// Memoized: the first call asks the OS, subsequent calls return the cached value.
pub fn user_home() -> Result<PathBuf, PathError> {
    let mut cached = USER_HOME_DIR
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());

    if let Some(path) = &*cached {
        return Ok(path.clone());
    }

    let home = dirs::home_dir().ok_or(PathError::HomeDirNotFound)?;
    *cached = Some(home.clone());
    Ok(home)
}

/// `<home>/.voxa`
pub fn user_config_dir(home: &Path) -> PathBuf {
    home.join(USER_CONFIG_DIR)
}

/// `<home>/.voxa/config`
pub fn user_config_file(home: &Path) -> PathBuf {
    user_config_dir(home).join(USER_CONFIG_FILENAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_layout() {
        let paths = ProjectPaths::new("/work/my-app");

        assert_eq!(paths.project_name(), "my-app");
        assert_eq!(paths.config_file(), PathBuf::from("/work/my-app/app.json"));
        assert_eq!(paths.models_dir(), PathBuf::from("/work/my-app/models"));
        assert_eq!(
            paths.model_file("en-US"),
            PathBuf::from("/work/my-app/models/en-US.json")
        );
        assert_eq!(paths.i18n_dir(), PathBuf::from("/work/my-app/app/i18n"));
        assert_eq!(paths.platforms_dir(), PathBuf::from("/work/my-app/platforms"));
    }

    #[test]
    fn test_for_new_project_joins_name() {
        let paths = ProjectPaths::for_new_project(Path::new("/work"), "hello").unwrap();
        assert_eq!(paths.root(), Path::new("/work/hello"));
    }

    #[test]
    fn test_for_new_project_rejects_escaping_names() {
        for name in ["/abs", "..", "a/b", "a/../..", ".", ""] {
            assert!(
                matches!(
                    ProjectPaths::for_new_project(Path::new("/work"), name),
                    Err(PathError::InvalidProjectName(_))
                ),
                "accepted {:?}",
                name
            );
        }
    }

    #[test]
    fn test_user_config_file() {
        assert_eq!(
            user_config_file(Path::new("/home/me")),
            PathBuf::from("/home/me/.voxa/config")
        );
    }
}

// src/constants.rs

//! Fixed names, paths and defaults shared across the crate.

/// The name of the project configuration file (at the project root).
pub const PROJECT_CONFIG_FILENAME: &str = "app.json";

/// The directory holding one language model file per locale.
pub const MODELS_DIR: &str = "models";

/// The directory holding the application sources.
pub const APP_DIR: &str = "app";

/// The directory (inside `app/`) holding translation files.
pub const I18N_DIR: &str = "i18n";

/// The directory holding platform export files.
pub const PLATFORMS_DIR: &str = "platforms";

/// Extension shared by configuration and model files.
pub const JSON_EXTENSION: &str = "json";

/// The per-user tool directory (in the home directory).
pub const USER_CONFIG_DIR: &str = ".voxa";

/// The per-user configuration file (inside `~/.voxa/`).
pub const USER_CONFIG_FILENAME: &str = "config";

/// Locale used when no model file can be found.
pub const DEFAULT_LOCALE: &str = "en-US";

/// Environment variable overriding the active configuration stage.
pub const STAGE_ENV_VAR: &str = "STAGE";

/// Base URL of the hosted webhook relay.
pub const WEBHOOK_BASE_URL: &str = "https://webhook.voxa.cloud";

/// Status API of a locally running ngrok daemon.
pub const NGROK_TUNNELS_API: &str = "http://localhost:4040/api/tunnels";

/// Local port the webhook server listens on by default.
pub const DEFAULT_WEBHOOK_PORT: u16 = 3000;

/// Path appended to tunnel URLs.
pub const WEBHOOK_PATH: &str = "/webhook";

/// bst configuration, relative to the home directory.
pub const BST_CONFIG_DIR: &str = ".bst";
/// bst configuration file name inside `.bst/`.
pub const BST_CONFIG_FILENAME: &str = "config";

// src/core/platform.rs

//! Supported voice platforms and where their data lives.

use serde_json::{Value, json};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A platform name that is not supported.
#[derive(Error, Debug, PartialEq, Eq)]
#[error("Unknown platform '{0}'. Expected 'alexaSkill' or 'googleAction'.")]
pub struct UnknownPlatform(pub String);

/// A voice platform a project can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    /// Amazon Alexa skill.
    AlexaSkill,
    /// Google Action backed by Dialogflow.
    GoogleAction,
}

/// Where a platform's native data sits inside a language model document.
#[derive(Debug, Clone, Copy)]
pub struct NativeLayout {
    /// Top-level key of the native section (`alexa`, `dialogflow`).
    pub section: &'static str,
    /// Path of the native intent list, relative to the document root.
    pub intents_path: &'static [&'static str],
    /// Key under `intents[]` mapping a model intent to a native intent name.
    pub mapping_key: &'static str,
    /// The single key a native section must consist of, if the platform has one.
    pub root_key: Option<&'static str>,
    /// Key accepted inside an object-typed input `type`.
    pub input_type_key: &'static str,
}

const ALEXA_LAYOUT: NativeLayout = NativeLayout {
    section: "alexa",
    intents_path: &["alexa", "interactionModel", "languageModel", "intents"],
    mapping_key: "alexa",
    root_key: Some("interactionModel"),
    input_type_key: "alexa",
};

const DIALOGFLOW_LAYOUT: NativeLayout = NativeLayout {
    section: "dialogflow",
    intents_path: &["dialogflow", "intents"],
    mapping_key: "dialogflow",
    root_key: None,
    input_type_key: "dialogflow",
};

impl Platform {
    /// Every platform, in config order.
    pub const ALL: [Self; 2] = [Self::AlexaSkill, Self::GoogleAction];

    /// The key of this platform's block in `app.json`.
    pub fn config_key(self) -> &'static str {
        match self {
            Self::AlexaSkill => "alexaSkill",
            Self::GoogleAction => "googleAction",
        }
    }

    /// Minimal settings block inserted into `app.json` when the platform is added.
    pub fn default_config_block(self) -> Value {
        match self {
            Self::AlexaSkill => json!({ "nlu": "alexa" }),
            Self::GoogleAction => json!({ "nlu": { "name": "dialogflow" } }),
        }
    }

    /// Where this platform's native data lives in a model.
    pub fn native_layout(self) -> &'static NativeLayout {
        match self {
            Self::AlexaSkill => &ALEXA_LAYOUT,
            Self::GoogleAction => &DIALOGFLOW_LAYOUT,
        }
    }
}

impl NativeLayout {
    /// Dotted form of [`NativeLayout::intents_path`].
    pub fn intents_path_string(&self) -> String {
        self.intents_path.join(".")
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.config_key())
    }
}

impl FromStr for Platform {
    type Err = UnknownPlatform;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "alexaSkill" | "alexa" => Ok(Self::AlexaSkill),
            "googleAction" | "dialogflow" => Ok(Self::GoogleAction),
            other => Err(UnknownPlatform(other.to_string())),
        }
    }
}

/// Source of the intents every project on a platform starts with.
pub trait DefaultIntents {
    /// Native intent objects, in the order they should appear.
    fn default_intents(&self, platform: Platform) -> Vec<Value>;
}

/// The stock intents shipped with the tool.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinDefaults;

impl DefaultIntents for BuiltinDefaults {
    fn default_intents(&self, platform: Platform) -> Vec<Value> {
        match platform {
            Platform::AlexaSkill => ["AMAZON.CancelIntent", "AMAZON.HelpIntent", "AMAZON.StopIntent"]
                .iter()
                .map(|name| json!({ "name": name, "samples": [] }))
                .collect(),
            Platform::GoogleAction => vec![
                json!({
                    "name": "Default Fallback Intent",
                    "auto": true,
                    "webhookUsed": true,
                    "fallbackIntent": true
                }),
                json!({
                    "name": "Default Welcome Intent",
                    "auto": true,
                    "webhookUsed": true,
                    "events": [{ "name": "WELCOME" }]
                }),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_platform_names() {
        assert_eq!("alexaSkill".parse(), Ok(Platform::AlexaSkill));
        assert_eq!("googleAction".parse(), Ok(Platform::GoogleAction));
        assert!("cortana".parse::<Platform>().is_err());
    }

    #[test]
    fn test_builtin_defaults_have_names() {
        for platform in Platform::ALL {
            let intents = BuiltinDefaults.default_intents(platform);
            assert!(!intents.is_empty());
            assert!(intents.iter().all(|i| i["name"].is_string()));
        }
    }
}

// src/core/validator.rs

//! # Model Validator
//!
//! Structural checks for language model documents. Validation is pure and
//! fail-fast: the first violation found is returned and nothing else is
//! inspected.
//!
//! Checks run in this order:
//! 1. every intent has a string `name`;
//! 2. every intent has a `phrases` array;
//! 3. every `{placeholder}` in a phrase names an entry of the intent's `inputs`;
//! 4. while searching (3), each input entry has a string `name` and a `type`,
//!    and an object `type` names at least one platform;
//! 5. a native platform section consists of exactly its root key;
//! 6. `inputTypes`, if present, is well formed.
//!
//! Presence follows JSON truthiness: `null`, `false`, `0` and `""` count as missing.

use crate::core::json_path::is_truthy;
use crate::core::platform::Platform;
use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;
use thiserror::Error;

lazy_static! {
    static ref PLACEHOLDER_RE: Regex = Regex::new(r"\{(.*?)\}").expect("placeholder regex is valid");
}

/// A rule a language model breaks. The message names the offending intent,
/// input or input type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Model must have an \"intents\" array")]
    MissingIntents,
    #[error("Intents must have \"name\"")]
    IntentMissingName,
    #[error("\"name\" must be type of string")]
    IntentNameNotString,
    #[error("Intent {intent}: intents must have \"phrases\"")]
    IntentMissingPhrases { intent: String },
    #[error("Intent {intent}: \"phrases\" must be type of array")]
    PhrasesNotArray { intent: String },
    #[error("Intent {intent}: every phrase must be a string")]
    PhraseNotString { intent: String },
    #[error("Intent {intent}: {placeholder} has to be defined in inputs array")]
    InputsMissing { intent: String, placeholder: String },
    #[error("Intent {intent}: \"inputs\" must be type of array")]
    InputsNotArray { intent: String },
    #[error("Input in intent {intent} must have \"name\"")]
    InputMissingName { intent: String },
    #[error("Input name in intent {intent} must be of type string")]
    InputNameNotString { intent: String },
    #[error("Input {input} in intent {intent} must have \"type\"")]
    InputMissingType { intent: String, input: String },
    #[error("Add alexa or/and dialogflow to the type of input {input} in intent {intent}")]
    InputTypeWithoutPlatform { intent: String, input: String },
    #[error(
        "Intent {intent}: {{{placeholder}}} is not in the inputs array. Every parameter in curly brackets has to be in the inputs array."
    )]
    UnresolvedPlaceholder { intent: String, placeholder: String },
    #[error("{section} must have only one object ({root_key})")]
    NativeSectionShape { section: String, root_key: String },
    #[error("{section} must have {root_key} object")]
    NativeSectionMissingRoot { section: String, root_key: String },
    #[error("inputTypes must be of type array")]
    InputTypesNotArray,
    #[error("Input types must have \"name\"")]
    InputTypeMissingName,
    #[error("Input type \"name\" must be type of string")]
    InputTypeNameNotString,
    #[error("Input type \"{input_type}\" must have \"values\"")]
    InputTypeMissingValues { input_type: String },
    #[error("Input type \"{input_type}\": \"values\" must be type of array")]
    ValuesNotArray { input_type: String },
    #[error("Input \"{input_type}\" values must have object with value")]
    ValueMissing { input_type: String },
    #[error("Input type \"{input_type}\": \"value\" must be type of string")]
    ValueNotString { input_type: String },
    #[error("Input type \"{input_type}\": \"synonyms\" must be type of array")]
    SynonymsNotArray { input_type: String },
    #[error("Input type \"{input_type}\": \"synonym\" must be type of string")]
    SynonymNotString { input_type: String },
}

type ValidationResult = Result<(), ValidationError>;

/// Validates a loaded language model document.
pub fn validate_model(model: &Value) -> ValidationResult {
    let intents = model
        .get("intents")
        .and_then(Value::as_array)
        .ok_or(ValidationError::MissingIntents)?;

    for intent in intents {
        validate_intent(intent)?;
    }

    for platform in Platform::ALL {
        validate_native_section(model, platform)?;
    }

    if let Some(input_types) = model.get("inputTypes").filter(|v| is_truthy(Some(v))) {
        validate_input_types(input_types)?;
    }

    Ok(())
}

fn validate_intent(intent: &Value) -> ValidationResult {
    let name = intent.get("name");
    if !is_truthy(name) {
        return Err(ValidationError::IntentMissingName);
    }
    let name = name
        .and_then(Value::as_str)
        .ok_or(ValidationError::IntentNameNotString)?;

    let phrases = intent.get("phrases");
    if !is_truthy(phrases) {
        return Err(ValidationError::IntentMissingPhrases {
            intent: name.to_string(),
        });
    }
    let phrases = phrases
        .and_then(Value::as_array)
        .ok_or_else(|| ValidationError::PhrasesNotArray {
            intent: name.to_string(),
        })?;

    for phrase in phrases {
        let phrase = phrase
            .as_str()
            .ok_or_else(|| ValidationError::PhraseNotString {
                intent: name.to_string(),
            })?;

        for captures in PLACEHOLDER_RE.captures_iter(phrase) {
            let placeholder = captures.get(1).map(|m| m.as_str()).unwrap_or_default();
            find_input(intent, name, placeholder)?;
        }
    }

    Ok(())
}

/// Looks up the input named `placeholder`, validating every input entry on the way.
fn find_input(intent: &Value, intent_name: &str, placeholder: &str) -> ValidationResult {
    let inputs = intent.get("inputs");
    if !is_truthy(inputs) {
        return Err(ValidationError::InputsMissing {
            intent: intent_name.to_string(),
            placeholder: placeholder.to_string(),
        });
    }
    let inputs = inputs
        .and_then(Value::as_array)
        .ok_or_else(|| ValidationError::InputsNotArray {
            intent: intent_name.to_string(),
        })?;

    let mut matches = 0usize;
    for input in inputs {
        let input_name = validate_input(input, intent_name)?;
        if input_name == placeholder {
            matches += 1;
        }
    }

    if matches == 0 {
        return Err(ValidationError::UnresolvedPlaceholder {
            intent: intent_name.to_string(),
            placeholder: placeholder.to_string(),
        });
    }
    Ok(())
}

fn validate_input<'a>(input: &'a Value, intent_name: &str) -> Result<&'a str, ValidationError> {
    let name = input.get("name");
    if !is_truthy(name) {
        return Err(ValidationError::InputMissingName {
            intent: intent_name.to_string(),
        });
    }
    let name = name
        .and_then(Value::as_str)
        .ok_or_else(|| ValidationError::InputNameNotString {
            intent: intent_name.to_string(),
        })?;

    let input_type = input.get("type");
    if !is_truthy(input_type) {
        return Err(ValidationError::InputMissingType {
            intent: intent_name.to_string(),
            input: name.to_string(),
        });
    }

    if let Some(t) = input_type
        && (t.is_object() || t.is_array())
    {
        let names_platform = Platform::ALL
            .iter()
            .any(|p| is_truthy(t.get(p.native_layout().input_type_key)));
        if !names_platform {
            return Err(ValidationError::InputTypeWithoutPlatform {
                intent: intent_name.to_string(),
                input: name.to_string(),
            });
        }
    }

    Ok(name)
}

fn validate_native_section(model: &Value, platform: Platform) -> ValidationResult {
    let layout = platform.native_layout();
    let Some(root_key) = layout.root_key else {
        return Ok(());
    };
    let section = model.get(layout.section);
    if !is_truthy(section) {
        return Ok(());
    }

    let key_count = section.and_then(Value::as_object).map_or(0, |m| m.len());
    if key_count != 1 {
        return Err(ValidationError::NativeSectionShape {
            section: layout.section.to_string(),
            root_key: root_key.to_string(),
        });
    }
    if !is_truthy(section.and_then(|s| s.get(root_key))) {
        return Err(ValidationError::NativeSectionMissingRoot {
            section: layout.section.to_string(),
            root_key: root_key.to_string(),
        });
    }
    Ok(())
}

fn validate_input_types(input_types: &Value) -> ValidationResult {
    let input_types = input_types
        .as_array()
        .ok_or(ValidationError::InputTypesNotArray)?;

    for input_type in input_types {
        let name = input_type.get("name");
        if !is_truthy(name) {
            return Err(ValidationError::InputTypeMissingName);
        }
        let name = name
            .and_then(Value::as_str)
            .ok_or(ValidationError::InputTypeNameNotString)?;

        let values = input_type.get("values");
        if !is_truthy(values) {
            return Err(ValidationError::InputTypeMissingValues {
                input_type: name.to_string(),
            });
        }
        let values = values
            .and_then(Value::as_array)
            .ok_or_else(|| ValidationError::ValuesNotArray {
                input_type: name.to_string(),
            })?;

        for value in values {
            validate_input_type_value(value, name)?;
        }
    }
    Ok(())
}

fn validate_input_type_value(value: &Value, input_type: &str) -> ValidationResult {
    let inner = value.get("value");
    if !is_truthy(inner) {
        return Err(ValidationError::ValueMissing {
            input_type: input_type.to_string(),
        });
    }
    if !inner.is_some_and(Value::is_string) {
        return Err(ValidationError::ValueNotString {
            input_type: input_type.to_string(),
        });
    }

    let synonyms = value.get("synonyms");
    if is_truthy(synonyms) {
        let synonyms = synonyms
            .and_then(Value::as_array)
            .ok_or_else(|| ValidationError::SynonymsNotArray {
                input_type: input_type.to_string(),
            })?;
        if !synonyms.iter().all(Value::is_string) {
            return Err(ValidationError::SynonymNotString {
                input_type: input_type.to_string(),
            });
        }
    }
    Ok(())
}

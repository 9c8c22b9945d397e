// src/core/interpolator.rs

//! Expansion of `${...}` placeholders in configuration values.

use crate::constants::WEBHOOK_BASE_URL;
use crate::core::webhook::{IdentityError, WebhookIdentityStore};
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashMap;
use std::ffi::OsString;
use thiserror::Error;

lazy_static! {
    // `${ token }`, surrounding whitespace is not part of the token.
    static ref PLACEHOLDER_RE: Regex =
        Regex::new(r"\$\{\s*([^}]*?)\s*\}").expect("placeholder regex is valid");
    static ref VAR_NAME_RE: Regex =
        Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("variable name regex is valid");
}

/// Placeholder that expands to the hosted webhook URL of the current user.
pub const WEBHOOK_URL_PLACEHOLDER: &str = "WEBHOOK_URL";

/// Errors raised while expanding `${...}` placeholders.
#[derive(Error, Debug)]
pub enum InterpolationError {
    /// The placeholder is not on the allow-list.
    #[error("Unsupported placeholder '${{{0}}}'. Only environment variable names and WEBHOOK_URL are allowed.")]
    UnsupportedPlaceholder(String),
    /// The named environment variable is not set.
    #[error("Environment variable '{0}' referenced by a placeholder is not set.")]
    UnknownVariable(String),
    /// `${WEBHOOK_URL}` was used without an identity store.
    #[error("'${{WEBHOOK_URL}}' cannot be resolved without a webhook identity store.")]
    WebhookUnavailable,
    /// The webhook identity could not be created.
    #[error(transparent)]
    Identity(#[from] IdentityError),
}

/// Snapshot of the ambient values placeholders may refer to.
///
/// Captured once per CLI session so lookups never race with changes to the
/// process environment.
#[derive(Debug, Clone, Default)]
pub struct Ambient {
    vars: HashMap<String, String>,
}

impl Ambient {
    /// Captures the current process environment.
    pub fn from_env() -> Self {
        Self::from_os_vars(std::env::vars_os())
    }

    /// Builds a snapshot from raw OS pairs. Pairs whose name or value is not
    /// valid UTF-8 are skipped, since no placeholder can name them.
    pub fn from_os_vars<I>(vars: I) -> Self
    where
        I: IntoIterator<Item = (OsString, OsString)>,
    {
        Self {
            vars: vars
                .into_iter()
                .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
                .collect(),
        }
    }

    /// Snapshot with exactly the given variables.
    pub fn with_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: vars.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }

    /// Value of `name`, if set.
    pub fn var(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }
}

/// Expands `${...}` placeholders over a fixed allow-list.
///
/// Accepted forms are `${NAME}`, `${env.NAME}` and `${process.env.NAME}`,
/// which read the ambient environment, and `${WEBHOOK_URL}`, which expands to
/// the user's hosted webhook address. Anything else is rejected; placeholder
/// contents are never evaluated.
#[derive(Debug, Clone, Copy)]
pub struct Interpolator<'a> {
    ambient: &'a Ambient,
    webhook: Option<&'a WebhookIdentityStore>,
}

impl<'a> Interpolator<'a> {
    /// Interpolator over `ambient`; `${WEBHOOK_URL}` stays unavailable.
    pub fn new(ambient: &'a Ambient) -> Self {
        Self {
            ambient,
            webhook: None,
        }
    }

    /// Enables `${WEBHOOK_URL}`, which creates the user's webhook identity on first use.
    pub fn with_webhook(mut self, store: &'a WebhookIdentityStore) -> Self {
        self.webhook = Some(store);
        self
    }

    /// Expands every placeholder in `template`, left to right, in a single pass.
    /// Substituted text is not expanded again.
    pub fn expand_string(&self, template: &str) -> Result<String, InterpolationError> {
        let mut output = String::with_capacity(template.len());
        let mut last_end = 0;

        for captures in PLACEHOLDER_RE.captures_iter(template) {
            let (Some(full), Some(token)) = (captures.get(0), captures.get(1)) else {
                continue;
            };
            output.push_str(template.get(last_end..full.start()).unwrap_or_default());
            output.push_str(&self.expand_token(token.as_str())?);
            last_end = full.end();
        }
        output.push_str(template.get(last_end..).unwrap_or_default());

        Ok(output)
    }

    fn expand_token(&self, token: &str) -> Result<String, InterpolationError> {
        if token == WEBHOOK_URL_PLACEHOLDER {
            let store = self.webhook.ok_or(InterpolationError::WebhookUnavailable)?;
            let uuid = store.get_or_create()?;
            return Ok(format!("{}/{}", WEBHOOK_BASE_URL, uuid));
        }

        let name = token
            .strip_prefix("process.env.")
            .or_else(|| token.strip_prefix("env."))
            .unwrap_or(token);

        if !VAR_NAME_RE.is_match(name) {
            return Err(InterpolationError::UnsupportedPlaceholder(token.to_string()));
        }

        self.ambient
            .var(name)
            .map(str::to_string)
            .ok_or_else(|| InterpolationError::UnknownVariable(name.to_string()))
    }
}

// src/core/mod.rs

//! Project model: paths, configuration, language models and endpoints.

pub mod config_store;
pub mod endpoint;
pub mod interpolator;
pub mod json_path;
pub mod model_store;
pub mod paths;
pub mod platform;
pub mod project;
pub mod validator;
pub mod webhook;

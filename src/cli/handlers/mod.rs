// src/cli/handlers/mod.rs

//! Command handlers, one module per command.

pub mod backup;
pub mod commons;
pub mod config;
pub mod endpoint;
pub mod invocation;
pub mod locales;
pub mod new;
pub mod platform;
pub mod validate;
pub mod webhook;

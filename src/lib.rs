//! `voxa`: project configuration and language-model tooling for voice applications.
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::indexing_slicing, clippy::panic))]

pub mod cli;
pub mod constants;
pub mod core;
pub mod state;
pub mod system;

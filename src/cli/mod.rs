// src/cli/mod.rs

//! Command-line front end.

use clap::Parser;
use std::path::PathBuf;

pub mod args;
pub mod dispatcher;
pub mod handlers;

/// voxa: manage the language models and configuration of a voice app project.
///
/// Usage: `voxa [--project <dir>] <command> [args...]`
///
/// Commands: new, validate, locales, backup, invocation, platform, endpoint,
/// config, webhook. Run `voxa <command> --help` for a command's options.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(disable_help_subcommand = true)]
#[command(trailing_var_arg = true)]
pub struct Cli {
    /// Project directory. Defaults to the current directory.
    #[arg(long, short = 'p')]
    pub project: Option<PathBuf>,

    /// The command followed by its own arguments.
    #[arg(allow_hyphen_values = true)]
    pub args: Vec<String>,
}

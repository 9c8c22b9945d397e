// src/bin/voxa.rs

//! `voxa` command-line entry point.

use anyhow::Result;
use clap::Parser;
use colored::*;
use voxa::{
    cli::{Cli, dispatcher},
    state::AppContext,
};

/// The main entry point of the `voxa` application.
/// It sets up logging, parses arguments, dispatches to the correct handler,
/// and performs centralized error handling.
fn main() {
    env_logger::init();

    if let Err(e) = run_cli(Cli::parse()) {
        eprintln!("\n{}: {:#}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run_cli(cli: Cli) -> Result<()> {
    log::debug!("CLI args parsed: {:?}", cli);
    let ctx = AppContext::from_env(cli.project)?;
    dispatcher::dispatch(cli.args, &ctx)
}

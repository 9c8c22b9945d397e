// src/cli/dispatcher.rs

//! Maps command names and aliases to their handlers.

use anyhow::{Result, anyhow};
use colored::*;

use crate::{cli::handlers, state::AppContext};

/// A command, its aliases, and its handler.
struct CommandDefinition {
    name: &'static str,
    aliases: &'static [&'static str],
    about: &'static str,
    handler: fn(Vec<String>, &AppContext) -> Result<()>,
}

/// The single source of truth for all commands.
static COMMAND_REGISTRY: &[CommandDefinition] = &[
    CommandDefinition {
        name: "new",
        aliases: &["init"],
        about: "Create a new project folder with config and model",
        handler: handlers::new::handle,
    },
    CommandDefinition {
        name: "validate",
        aliases: &[],
        about: "Validate the language models",
        handler: handlers::validate::handle,
    },
    CommandDefinition {
        name: "locales",
        aliases: &["ls"],
        about: "List the locales of the project",
        handler: handlers::locales::handle,
    },
    CommandDefinition {
        name: "backup",
        aliases: &[],
        about: "Copy language models to dated backup files",
        handler: handlers::backup::handle,
    },
    CommandDefinition {
        name: "invocation",
        aliases: &[],
        about: "Set the invocation name of the models",
        handler: handlers::invocation::handle,
    },
    CommandDefinition {
        name: "platform",
        aliases: &["add"],
        about: "Add a platform to config and models",
        handler: handlers::platform::handle,
    },
    CommandDefinition {
        name: "endpoint",
        aliases: &[],
        about: "Resolve and store the webhook endpoint",
        handler: handlers::endpoint::handle,
    },
    CommandDefinition {
        name: "config",
        aliases: &["get"],
        about: "Print the stage-merged configuration or one value of it",
        handler: handlers::config::handle,
    },
    CommandDefinition {
        name: "webhook",
        aliases: &[],
        about: "Print your hosted webhook URL",
        handler: handlers::webhook::handle,
    },
];

/// Finds a command definition in the registry by its name or alias.
fn find_command(name: &str) -> Option<&'static CommandDefinition> {
    COMMAND_REGISTRY
        .iter()
        .find(|cmd| cmd.name == name || cmd.aliases.contains(&name))
}

fn print_commands() {
    println!("{}", "Commands:".yellow().bold());
    for cmd in COMMAND_REGISTRY {
        println!("  {:<12} {}", cmd.name.cyan(), cmd.about);
    }
}

/// Routes `<command> [args...]` to the command's handler.
pub fn dispatch(all_args: Vec<String>, ctx: &AppContext) -> Result<()> {
    log::debug!("Dispatching args: {:?}", all_args);

    let mut args = all_args.into_iter();
    let Some(name) = args.next() else {
        print_commands();
        return Ok(());
    };

    let command = find_command(&name).ok_or_else(|| {
        anyhow!(
            "Unknown command '{}'. Run 'voxa' without arguments to list commands.",
            name
        )
    })?;

    (command.handler)(args.collect(), ctx)
}

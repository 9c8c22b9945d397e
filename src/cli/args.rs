// src/cli/args.rs

//! Argument definitions of the individual commands.

use clap::Parser;

/// Arguments of `new`.
#[derive(Parser, Debug, Default)]
#[command(no_binary_name = true)] // Important: the command name is not part of the args.
pub struct NewArgs {
    /// Name of the project folder to create.
    pub name: String,

    /// Locale of the initial language model.
    #[arg(long, short, default_value = crate::constants::DEFAULT_LOCALE)]
    pub locale: String,

    /// Platform to enable right away (`alexaSkill` or `googleAction`).
    #[arg(long)]
    pub platform: Option<String>,

    /// Invocation name of the initial model. Defaults to the project name.
    #[arg(long)]
    pub invocation: Option<String>,

    /// Replace an existing folder of the same name.
    #[arg(long)]
    pub overwrite: bool,
}

/// Arguments shared by commands that work on one or all locales.
#[derive(Parser, Debug, Default)]
#[command(no_binary_name = true)]
pub struct LocaleArgs {
    /// Only this locale. Defaults to every model in `models/`.
    #[arg(long, short)]
    pub locale: Option<String>,
}

/// Arguments of `invocation`.
#[derive(Parser, Debug, Default)]
#[command(no_binary_name = true)]
pub struct InvocationArgs {
    /// The new invocation name.
    pub invocation: String,

    /// Only this locale. Defaults to every model.
    #[arg(long, short)]
    pub locale: Option<String>,
}

/// Arguments of `platform`.
#[derive(Parser, Debug, Default)]
#[command(no_binary_name = true)]
pub struct PlatformArgs {
    /// `alexaSkill` or `googleAction`.
    pub platform: String,
}

/// Arguments of `endpoint`.
#[derive(Parser, Debug, Default)]
#[command(no_binary_name = true)]
pub struct EndpointArgs {
    /// `ngrok`, `bst-proxy`, `voxa-webhook` or `none`.
    pub kind: String,

    /// Local port the ngrok tunnel forwards to.
    #[arg(long, default_value_t = crate::constants::DEFAULT_WEBHOOK_PORT)]
    pub port: u16,
}

/// Arguments of `config`.
#[derive(Parser, Debug, Default)]
#[command(no_binary_name = true)]
pub struct ConfigArgs {
    /// Dotted path of a single value, e.g. `googleAction.nlu.name`.
    pub path: Option<String>,

    /// Stage to merge instead of `$STAGE` or `defaultStage`.
    #[arg(long, short)]
    pub stage: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_args_defaults() {
        let args = NewArgs::try_parse_from(["hello"]).unwrap();
        assert_eq!(args.name, "hello");
        assert_eq!(args.locale, "en-US");
        assert!(!args.overwrite);
    }

    #[test]
    fn test_endpoint_args_port() {
        let args = EndpointArgs::try_parse_from(["ngrok", "--port", "8080"]).unwrap();
        assert_eq!(args.kind, "ngrok");
        assert_eq!(args.port, 8080);
    }
}

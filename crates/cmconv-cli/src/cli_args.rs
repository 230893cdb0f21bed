use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueHint};
use cmconv_core::ClientOverrides;

/// Top-level CLI entrypoint.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "cmconv",
    version,
    about = "Convert images between color models using a remote conversion service",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Supported subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// List the supported color models and their parameters.
    #[command(alias = "ls")]
    Models(ModelsArgs),
    /// Upload one image and save the original/converted pair.
    Convert(ConvertArgs),
    /// Inspect or change the persisted configuration.
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Debug, Clone, Args, Default)]
pub struct ModelsArgs {
    /// Include model descriptions.
    #[arg(short, long, action = ArgAction::SetTrue)]
    pub verbose: bool,

    /// Print the registry as JSON.
    #[arg(long, action = ArgAction::SetTrue, conflicts_with = "verbose")]
    pub json: bool,
}

#[derive(Debug, Clone, Args)]
pub struct ConvertArgs {
    /// Image to upload. A leading `~` is expanded.
    #[arg(value_name = "FILE", value_hint = ValueHint::FilePath)]
    pub file: PathBuf,

    /// Color model id (defaults to the configured default model).
    #[arg(short, long, value_name = "ID")]
    pub model: Option<String>,

    /// Parameter assignment such as `param1=0.5`; repeatable.
    #[arg(
        short = 'p',
        long = "param",
        value_name = "KEY=VALUE",
        value_parser = parse_param_assignment
    )]
    pub params: Vec<(String, f64)>,

    /// Directory the two PNG files are written to.
    #[arg(short, long, value_name = "DIR", default_value = ".", value_hint = ValueHint::DirPath)]
    pub out_dir: PathBuf,

    /// Print `data:image/png;base64,...` sources instead of writing files.
    #[arg(long, action = ArgAction::SetTrue)]
    pub data_uri: bool,

    #[command(flatten)]
    pub client: ClientArgs,
}

/// Connection flags that override the config file for one run.
#[derive(Debug, Clone, Args, Default)]
pub struct ClientArgs {
    /// Conversion endpoint URL.
    #[arg(long, value_name = "URL", value_hint = ValueHint::Url)]
    pub endpoint: Option<String>,

    /// Request timeout in seconds.
    #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,
}

impl ClientArgs {
    pub fn to_overrides(&self) -> ClientOverrides {
        ClientOverrides {
            endpoint: self.endpoint.clone(),
            timeout_secs: self.timeout,
        }
    }
}

/// Configuration subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum ConfigCommand {
    /// Print the path of config.toml.
    Path,
    /// Print the effective configuration.
    Show,
    /// Update persisted values.
    Set(ConfigSetArgs),
}

#[derive(Debug, Clone, Args, Default)]
pub struct ConfigSetArgs {
    /// Conversion endpoint URL.
    #[arg(long, value_name = "URL")]
    pub endpoint: Option<String>,

    /// Request timeout in seconds.
    #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,

    /// Color model selected at startup.
    #[arg(long, value_name = "ID")]
    pub default_model: Option<String>,
}

impl ConfigSetArgs {
    pub fn is_empty(&self) -> bool {
        self.endpoint.is_none() && self.timeout.is_none() && self.default_model.is_none()
    }
}

/// Parse `KEY=VALUE` where VALUE is a finite number.
pub fn parse_param_assignment(raw: &str) -> Result<(String, f64), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{raw}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing parameter name in '{raw}'"));
    }
    let value: f64 = value
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not a number", value.trim()))?;
    if !value.is_finite() {
        return Err(format!("'{raw}' is not a finite number"));
    }
    Ok((key.to_string(), value))
}

//! CLI parse: clap types for genrun. No behavior; definitions only.

use crate::types::ModelCoordinate;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// genrun - run code generators against repository models
#[derive(Parser)]
#[command(name = "genrun")]
#[command(about = "Run code generators against models from a model repository")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Workspace root directory (where config/ is looked up)
    #[arg(long, default_value = ".")]
    pub workspace: PathBuf,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output is "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List registered generators
    Generators {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Generate from a model stored in the repository
    Generate {
        /// Model coordinate as namespace.name:version
        model: ModelCoordinate,
        /// Authorization header value passed to model and mapping downloads
        #[arg(long)]
        auth: Option<String>,
        #[command(flatten)]
        args: GenerateArgs,
    },
    /// Generate from a JSON model content file
    Inline {
        /// Path to the model content (root coordinate plus model documents)
        content: PathBuf,
        #[command(flatten)]
        args: GenerateArgs,
    },
    /// Generate from parameters only, without a model
    Template {
        #[command(flatten)]
        args: GenerateArgs,
    },
    /// Print the effective configuration as TOML
    Config,
}

/// Options shared by every generating subcommand.
#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
    /// Generator key
    #[arg(short, long)]
    pub generator: String,

    /// Invocation parameter as key=value (repeatable)
    #[arg(short = 'p', long = "param", value_parser = parse_parameter)]
    pub params: Vec<(String, String)>,

    /// Output file or directory (defaults to the artifact's own file name)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Parse a `key=value` parameter. The value may itself contain `=`.
pub fn parse_parameter(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("invalid parameter '{}': expected key=value", raw))?;
    if key.trim().is_empty() {
        return Err(format!("invalid parameter '{}': empty key", raw));
    }
    Ok((key.trim().to_string(), value.to_string()))
}

//! genrun CLI Binary
//!
//! Command-line front end for the generator runner.

use clap::Parser;
use genrun::cli::{map_error, Cli, RunContext};
use genrun::config::ConfigLoader;
use genrun::generator::builtin::ModelDumpGenerator;
use genrun::generator::GeneratorRegistry;
use genrun::logging::{init_logging, LoggingConfig};
use std::process;
use std::sync::Arc;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Build logging config from CLI args, env vars, and config file
    let logging_config = build_logging_config(&cli);

    if let Err(e) = init_logging(Some(&logging_config)) {
        eprintln!("Failed to initialize logging: {}", e);
        process::exit(1);
    }

    info!("genrun starting");

    let registry = match build_registry() {
        Ok(registry) => Arc::new(registry),
        Err(e) => {
            error!("Error registering generators: {}", e);
            eprintln!("{}", map_error(&e));
            process::exit(1);
        }
    };

    let context = match RunContext::new(cli.workspace.clone(), cli.config.clone(), registry) {
        Ok(ctx) => ctx,
        Err(e) => {
            error!("Error initializing: {}", e);
            eprintln!("{}", map_error(&e));
            process::exit(1);
        }
    };

    match context.execute(&cli.command).await {
        Ok(output) => {
            info!("Command completed successfully");
            println!("{}", output);
        }
        Err(e) => {
            error!("Command failed: {}", e);
            eprintln!("{}", map_error(&e));
            process::exit(1);
        }
    }
}

fn build_registry() -> Result<GeneratorRegistry, genrun::error::ApiError> {
    let mut registry = GeneratorRegistry::new();
    registry.register(Arc::new(ModelDumpGenerator))?;
    Ok(registry)
}

/// Build logging configuration from config file, then CLI args
fn build_logging_config(cli: &Cli) -> LoggingConfig {
    let mut config = match cli.config {
        Some(ref config_path) => ConfigLoader::load_from_file(config_path)
            .ok()
            .map(|c| c.logging)
            .unwrap_or_default(),
        None => ConfigLoader::load(&cli.workspace)
            .ok()
            .map(|c| c.logging)
            .unwrap_or_default(),
    };

    // CLI arguments win
    if let Some(ref level) = cli.log_level {
        config.level = level.clone();
    }
    if let Some(ref format) = cli.log_format {
        config.format = format.clone();
    }
    if let Some(ref output) = cli.log_output {
        config.output = output.clone();
    }
    if let Some(ref file) = cli.log_file {
        config.file = file.clone();
    }

    config
}

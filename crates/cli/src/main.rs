//! Portal CLI - supplier onboarding portal client

mod commands;
mod config;
mod logging;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use commands::{Commands, Context};
use std::path::PathBuf;
use tracing::{Level, debug, error};

#[derive(Parser)]
#[command(name = "portal")]
#[command(about = "Client for the supplier onboarding portal")]
#[command(version)]
struct Cli {
    /// Set logging level
    #[arg(short = 'l', long, global = true, default_value = "warn")]
    log_level: LogLevel,

    /// Directory holding the session file and logs
    #[arg(short = 'd', long, global = true)]
    data_dir: Option<PathBuf>,

    /// Client configuration file (TOML, YAML or JSON)
    #[arg(short = 'c', long, global = true)]
    config: Option<PathBuf>,

    /// API base URL, overrides configuration
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Print the raw `{data, error}` envelope
    #[arg(long, global = true)]
    json: bool,

    /// Also write logs to `cli.log` in the data directory
    #[arg(long, global = true)]
    log_file: bool,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let data_dir = config::resolve_data_dir(cli.data_dir);
    logging::init_logging(cli.log_level.into(), &data_dir, cli.log_file)?;

    let client_config = config::load_client_config(cli.config.as_deref(), &data_dir, cli.api_url)?;
    let context = Context::new(&client_config, data_dir, cli.json)?;

    match cli.command.execute(&context).await {
        Ok(true) => {
            debug!("Command completed successfully");
        }
        Ok(false) => std::process::exit(1),
        Err(e) => {
            error!("Command failed: {e:#}");
            eprintln!("Error: {e:#}");
            std::process::exit(1);
        }
    }

    Ok(())
}

#[derive(Clone, Debug, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for Level {
    fn from(log_level: LogLevel) -> Self {
        match log_level {
            LogLevel::Error => Self::ERROR,
            LogLevel::Warn => Self::WARN,
            LogLevel::Info => Self::INFO,
            LogLevel::Debug => Self::DEBUG,
            LogLevel::Trace => Self::TRACE,
        }
    }
}

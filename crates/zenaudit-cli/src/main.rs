//! ZenAudit CLI - Command-line interface for the ZenAudit API
//!
//! Provides commands for:
//! - Registering and unregistering organisations
//! - Managing the services of an organisation
//! - Saving and querying audit records
//! - Inspecting the configuration

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod output;

use commands::{
    config::ConfigCommand, org::OrgCommand, record::RecordCommand, service::ServiceCommand,
    GlobalOptions,
};
use output::{get_formatter, OutputFormat};

#[derive(Debug, Parser)]
#[command(name = "zenaudit", version, about = "Immutable audit records for organisations and their services")]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    json: bool,

    /// Verbose output (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Use alternate config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Base URL of the audit API (overrides client.base_url)
    #[arg(long, global = true)]
    url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Manage organisations
    #[command(subcommand)]
    Org(OrgCommand),
    /// Manage the services of an organisation
    #[command(subcommand)]
    Service(ServiceCommand),
    /// Save and query audit records
    #[command(subcommand)]
    Record(RecordCommand),
    /// View and check configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Setup tracing; stderr keeps stdout clean for --json
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Human
    };
    let opts = GlobalOptions {
        format,
        config: cli.config,
        url: cli.url,
    };

    let result = match &cli.command {
        Commands::Org(cmd) => cmd.execute(&opts).await,
        Commands::Service(cmd) => cmd.execute(&opts).await,
        Commands::Record(cmd) => cmd.execute(&opts).await,
        Commands::Config(cmd) => cmd.execute(&opts).await,
    };

    if let Err(e) = result {
        get_formatter(format).error(&format!("{e:#}"));
        std::process::exit(1);
    }
}

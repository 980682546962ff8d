//! ZenAudit Daemon - HTTP API for immutable audit records
//!
//! This binary opens the audit store, builds the registry and audit record
//! use cases and serves them over HTTP until SIGTERM/SIGINT.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use zenaudit_core::config::Config;
use zenaudit_core::domain::MonotonicClock;
use zenaudit_core::usecases::{AuditRecordUseCase, RegistryUseCase};
use zenaudit_server::{ApiHandler, ApiServer};
use zenaudit_store::{DatabasePool, SqliteAuditRepository, TableNames};

/// ZenAudit API daemon
#[derive(Parser, Debug)]
#[command(name = "zenauditd", version, about)]
struct Args {
    /// Path to the configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Address to listen on (overrides server.listen)
    #[arg(long)]
    listen: Option<String>,

    /// SQLite database file (overrides store.database)
    #[arg(long)]
    database: Option<PathBuf>,

    /// Table name prefix (overrides store.table_prefix)
    #[arg(long)]
    prefix: Option<String>,
}

impl Args {
    /// Loads the configuration file and applies command-line overrides
    ///
    /// The second value is set when the default file exists but is invalid
    /// and built-in defaults were used instead. It is reported once logging
    /// is up.
    fn load_config(&self) -> Result<(Config, Option<String>)> {
        let (mut config, fallback) = match &self.config {
            Some(path) => {
                let config = Config::load(path)
                    .with_context(|| format!("Failed to load config from {}", path.display()))?;
                (config, None)
            }
            None => config_or_default(&Config::default_path()),
        };

        if let Some(listen) = &self.listen {
            config.server.listen = listen.clone();
        }
        if let Some(database) = &self.database {
            config.store.database = database.clone();
        }
        if let Some(prefix) = &self.prefix {
            config.store.table_prefix = prefix.clone();
        }

        let errors = config.validate();
        if !errors.is_empty() {
            let details: Vec<String> = errors.iter().map(ToString::to_string).collect();
            anyhow::bail!("Invalid configuration: {}", details.join("; "));
        }

        Ok((config, fallback))
    }
}

/// Loads `path` if present, or the defaults with the reason the file was skipped
fn config_or_default(path: &Path) -> (Config, Option<String>) {
    match Config::load_if_present(path) {
        Ok(config) => (config.unwrap_or_default(), None),
        Err(e) => (
            Config::default(),
            Some(format!("Invalid config at {}: {e:#}", path.display())),
        ),
    }
}

/// Cancels `token` when SIGINT or SIGTERM is received
async fn shutdown_signal(token: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received SIGINT (Ctrl+C)");
        }
        _ = terminate => {
            info!("Received SIGTERM");
        }
    }

    token.cancel();
}

/// Opens the store and wires the use cases into a request handler
async fn build_handler(config: &Config) -> Result<ApiHandler> {
    let tables = TableNames::with_prefix(&config.store.table_prefix)?;
    let pool = DatabasePool::new(&config.store.database, tables)
        .await
        .context("Failed to open database")?;
    let repository = Arc::new(SqliteAuditRepository::new(
        pool.pool().clone(),
        pool.tables().clone(),
    ));

    let registry = RegistryUseCase::new(repository.clone(), Arc::new(MonotonicClock::new()));
    let records = AuditRecordUseCase::new(repository, registry.clone())
        .with_require_active_service(config.audit.require_active_service);

    Ok(ApiHandler::new(registry, records))
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let (config, fallback) = args.load_config()?;

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .init();

    if let Some(reason) = fallback {
        warn!(reason = %reason, "Using built-in default configuration");
    }

    info!(
        database = %config.store.database.display(),
        prefix = %config.store.table_prefix,
        "ZenAudit daemon starting (zenauditd)"
    );

    let handler = Arc::new(build_handler(&config).await?);
    let server = ApiServer::new(handler, &config.server.listen)
        .with_context(|| format!("Invalid listen address '{}'", config.server.listen))?;

    let shutdown_token = CancellationToken::new();
    let signal_token = shutdown_token.clone();
    tokio::spawn(async move {
        shutdown_signal(signal_token).await;
    });

    let result = server.run(shutdown_token).await;

    match &result {
        Ok(()) => info!("ZenAudit daemon shut down gracefully"),
        Err(e) => error!(error = %e, "ZenAudit daemon exiting with error"),
    }

    result
}

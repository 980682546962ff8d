//! CLI subcommands
//!
//! Every command receives the [`GlobalOptions`] parsed from the top-level
//! flags and builds what it needs (configuration, API client) from them.

pub mod config;
pub mod org;
pub mod record;
pub mod service;
pub mod time;

use std::path::PathBuf;

use anyhow::{Context, Result};
use zenaudit_client::AuditClient;
use zenaudit_core::config::Config;

use crate::output::OutputFormat;

/// Flags shared by every subcommand
#[derive(Debug, Clone)]
pub struct GlobalOptions {
    pub format: OutputFormat,
    /// Explicit `--config` path, if any
    pub config: Option<PathBuf>,
    /// Explicit `--url`, overriding `client.base_url`
    pub url: Option<String>,
}

impl GlobalOptions {
    /// Path of the configuration file in effect
    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(Config::default_path)
    }

    /// Loads the configuration
    ///
    /// An explicit `--config` file must exist and parse; the default
    /// location falls back to built-in defaults.
    pub fn load_config(&self) -> Result<Config> {
        match &self.config {
            Some(path) => Config::load(path)
                .with_context(|| format!("Failed to load config from {}", path.display())),
            None => Ok(Config::load_or_default(&Config::default_path())),
        }
    }

    /// Builds an API client for `--url` or the configured base URL
    pub fn client(&self) -> Result<AuditClient> {
        let base_url = match &self.url {
            Some(url) => url.clone(),
            None => self.load_config()?.client.base_url,
        };
        tracing::debug!(base_url = %base_url, "Using audit API");
        Ok(AuditClient::new(base_url))
    }
}

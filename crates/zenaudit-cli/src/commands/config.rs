//! Config command - View and check ZenAudit configuration
//!
//! Provides the `zenaudit config` CLI command which:
//! 1. Shows the configuration in effect (YAML or JSON)
//! 2. Validates the configuration file and reports errors
//! 3. Prints the path of the configuration file

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Subcommand;
use tracing::info;
use zenaudit_core::config::Config;

use super::GlobalOptions;
use crate::output::get_formatter;

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Display current configuration
    Show,
    /// Validate configuration file
    Validate,
    /// Print the configuration file path
    Path,
}

impl ConfigCommand {
    /// Execute the config command
    pub async fn execute(&self, opts: &GlobalOptions) -> Result<()> {
        match self {
            ConfigCommand::Show => self.execute_show(opts),
            ConfigCommand::Validate => self.execute_validate(opts),
            ConfigCommand::Path => self.execute_path(opts),
        }
    }

    fn execute_show(&self, opts: &GlobalOptions) -> Result<()> {
        let formatter = get_formatter(opts.format);

        let config_path = opts.config_path();
        let config = opts.load_config()?;

        info!(config_path = %config_path.display(), "Showing configuration");

        if opts.format.is_json() {
            let json = serde_json::to_value(&config)
                .context("Failed to serialize configuration to JSON")?;
            formatter.print_json(&json);
        } else {
            formatter.success(&format!("Configuration ({})", config_path.display()));
            formatter.info("");

            let yaml = serde_yaml::to_string(&config)
                .context("Failed to serialize configuration to YAML")?;

            for line in yaml.lines() {
                formatter.info(line);
            }
        }

        Ok(())
    }

    fn execute_validate(&self, opts: &GlobalOptions) -> Result<()> {
        let formatter = get_formatter(opts.format);
        let report = ValidationReport::check(opts.config_path());

        info!(config_path = %report.config_path.display(), "Validating configuration");

        if opts.format.is_json() {
            formatter.print_json(&serde_json::json!({
                "valid": report.is_valid(),
                "config_path": report.config_path.display().to_string(),
                "errors": report.errors,
            }));
            return Ok(());
        }

        let file_line = format!("File: {}", report.config_path.display());
        if !report.found {
            formatter.warn(&format!(
                "Configuration file not found at {}",
                report.config_path.display()
            ));
            formatter.info("Using default configuration.");
        } else if report.is_valid() {
            formatter.success("Configuration is valid");
            formatter.info(&file_line);
        } else {
            formatter.error(&format!(
                "Configuration has {} error{}:",
                report.errors.len(),
                if report.errors.len() == 1 { "" } else { "s" }
            ));
            formatter.info(&file_line);
            formatter.info("");
            for error in &report.errors {
                formatter.info(&format!("  {}", error));
            }
        }

        Ok(())
    }

    fn execute_path(&self, opts: &GlobalOptions) -> Result<()> {
        let formatter = get_formatter(opts.format);
        let config_path = opts.config_path();

        if opts.format.is_json() {
            formatter.print_json(&serde_json::json!({
                "config_path": config_path.display().to_string(),
                "exists": config_path.exists(),
            }));
        } else {
            formatter.info(&config_path.display().to_string());
        }

        Ok(())
    }
}

/// Outcome of checking one configuration file
#[derive(Debug)]
struct ValidationReport {
    config_path: PathBuf,
    /// False when the file does not exist; defaults are then in effect
    found: bool,
    errors: Vec<String>,
}

impl ValidationReport {
    /// Loads the file itself (not the defaults) and collects every problem
    fn check(config_path: PathBuf) -> Self {
        if !config_path.exists() {
            return Self {
                config_path,
                found: false,
                errors: vec!["Configuration file not found. Using defaults.".to_string()],
            };
        }

        let errors = match Config::load(&config_path) {
            Ok(config) => config.validate().iter().map(ToString::to_string).collect(),
            Err(e) => vec![format!("Failed to parse configuration: {e:#}")],
        };

        Self {
            config_path,
            found: true,
            errors,
        }
    }

    fn is_valid(&self) -> bool {
        self.found && self.errors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::output::OutputFormat;

    fn opts_for(path: std::path::PathBuf) -> GlobalOptions {
        GlobalOptions {
            format: OutputFormat::Json,
            config: Some(path),
            url: None,
        }
    }

    #[test]
    fn test_explicit_config_is_loaded() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "client:\n  base_url: http://audit.internal:8080").unwrap();

        let opts = opts_for(file.path().to_path_buf());
        let config = opts.load_config().unwrap();
        assert_eq!(config.client.base_url, "http://audit.internal:8080");
        assert_eq!(config.store.table_prefix, "zen");
    }

    #[test]
    fn test_missing_explicit_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let opts = opts_for(dir.path().join("absent.yaml"));
        assert!(opts.load_config().is_err());
    }

    #[tokio::test]
    async fn test_validate_missing_file_is_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.yaml");

        let report = ValidationReport::check(path.clone());
        assert!(!report.found);
        assert!(!report.is_valid());

        assert!(ConfigCommand::Validate.execute(&opts_for(path)).await.is_ok());
    }

    #[test]
    fn test_validate_reports_invalid_prefix() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "store:\n  table_prefix: \"bad prefix\"").unwrap();

        let report = ValidationReport::check(file.path().to_path_buf());
        assert!(report.found);
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].starts_with("store.table_prefix"));
    }

    #[test]
    fn test_validate_reports_parse_failure() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "server: [unclosed").unwrap();

        let report = ValidationReport::check(file.path().to_path_buf());
        assert!(report.found);
        assert!(report.errors[0].starts_with("Failed to parse configuration"));
    }

    #[test]
    fn test_validate_accepts_defaults_written_out() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", serde_yaml::to_string(&Config::default()).unwrap()).unwrap();

        assert!(ValidationReport::check(file.path().to_path_buf()).is_valid());
    }

    #[test]
    fn test_url_flag_overrides_config() {
        let dir = tempfile::tempdir().unwrap();
        let opts = GlobalOptions {
            format: OutputFormat::Human,
            config: Some(dir.path().join("absent.yaml")),
            url: Some("http://localhost:9000/".to_string()),
        };
        let client = opts.client().unwrap();
        assert_eq!(client.base_url(), "http://localhost:9000");
    }
}

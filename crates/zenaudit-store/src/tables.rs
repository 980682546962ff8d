//! Prefixed table names
//!
//! Several installations may share one database file by using different
//! prefixes. The prefix is interpolated into SQL text, so it is checked
//! against the same rule the configuration validator uses.

use zenaudit_core::config::is_valid_table_prefix;

use crate::StoreError;

/// Names of the three tables for one prefix
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableNames {
    /// Organisation timeline (`{prefix}_org`)
    pub organisations: String,
    /// Service timeline (`{prefix}_org_service`)
    pub services: String,
    /// Audit records (`{prefix}_audit`)
    pub audit: String,
}

impl TableNames {
    /// Builds the table names for `prefix`
    ///
    /// # Errors
    ///
    /// Returns `StoreError::InvalidPrefix` unless the prefix is 1-32 ASCII
    /// letters, digits or underscores.
    pub fn with_prefix(prefix: &str) -> Result<Self, StoreError> {
        if !is_valid_table_prefix(prefix) {
            return Err(StoreError::InvalidPrefix(prefix.to_string()));
        }
        Ok(Self {
            organisations: format!("{prefix}_org"),
            services: format!("{prefix}_org_service"),
            audit: format!("{prefix}_audit"),
        })
    }

    /// Substitutes `{organisations}`, `{services}` and `{audit}` in `sql`
    pub fn render(&self, sql: &str) -> String {
        sql.replace("{organisations}", &self.organisations)
            .replace("{services}", &self.services)
            .replace("{audit}", &self.audit)
    }
}

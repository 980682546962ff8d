//! Record command - Write and query audit records
//!
//! Provides the `zenaudit record` CLI command which:
//! 1. Saves an audit record for an organisation/service pair
//! 2. Lists the records of a service or of a user, within a time range
//!
//! Time arguments accept everything [`parse_time`] does.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use tracing::info;
use zenaudit_client::types::{AuditRecord, NewAuditRecord};
use zenaudit_core::domain::{AuditRecordQuery, DEFAULT_QUERY_LIMIT};

use super::time::{format_timestamp, parse_time};
use super::GlobalOptions;
use crate::output::{get_formatter, OutputFormatter, Table};

/// Range arguments shared by the record queries
#[derive(Debug, Args)]
pub struct QueryArgs {
    /// Only records at or after this time (e.g., "1h", "2d", "2024-01-01")
    #[arg(long)]
    pub since: Option<String>,

    /// Only records at or before this time
    #[arg(long)]
    pub until: Option<String>,

    /// Maximum number of records to show
    #[arg(long, default_value_t = DEFAULT_QUERY_LIMIT)]
    pub limit: u32,

    /// Show the oldest records first
    #[arg(long)]
    pub oldest_first: bool,
}

impl QueryArgs {
    fn to_query(&self) -> Result<AuditRecordQuery> {
        let mut query = AuditRecordQuery::new().with_limit(self.limit);
        if let Some(since) = &self.since {
            let since =
                parse_time(since).with_context(|| format!("Invalid --since value: '{}'", since))?;
            query = query.with_since(since);
        }
        if let Some(until) = &self.until {
            let until =
                parse_time(until).with_context(|| format!("Invalid --until value: '{}'", until))?;
            query = query.with_until(until);
        }
        if self.oldest_first {
            query = query.oldest_first();
        }
        Ok(query)
    }
}

/// Record subcommands
#[derive(Debug, Subcommand)]
pub enum RecordCommand {
    /// Save an audit record
    Save {
        /// Organisation id
        org: String,
        /// Service id
        service: String,
        /// User on whose behalf the action was taken
        #[arg(long)]
        obo: String,
        /// User who performed the action (defaults to --obo)
        #[arg(long)]
        actor: Option<String>,
        /// Event time
        #[arg(long, default_value = "now")]
        timestamp: String,
    },
    /// List the records of a service
    Service {
        /// Organisation id
        org: String,
        /// Service id
        service: String,
        #[command(flatten)]
        query: QueryArgs,
    },
    /// List the records of a user across every service of an organisation
    User {
        /// Organisation id
        org: String,
        /// User id
        obo: String,
        #[command(flatten)]
        query: QueryArgs,
    },
}

impl RecordCommand {
    /// Execute the record command
    pub async fn execute(&self, opts: &GlobalOptions) -> Result<()> {
        let formatter = get_formatter(opts.format);
        let client = opts.client()?;

        match self {
            RecordCommand::Save {
                org,
                service,
                obo,
                actor,
                timestamp,
            } => {
                let timestamp = parse_time(timestamp)
                    .with_context(|| format!("Invalid --timestamp value: '{}'", timestamp))?;
                let record = NewAuditRecord {
                    timestamp: timestamp.as_i64(),
                    obo_id: obo.clone(),
                    actor_id: actor.clone().unwrap_or_else(|| obo.clone()),
                };
                let receipt = client
                    .save_record(org, service, &record)
                    .await
                    .context("Failed to save audit record")?;

                info!(total_time = receipt.total_time, "Saved audit record");

                if opts.format.is_json() {
                    formatter.print_json(&serde_json::to_value(&receipt)?);
                } else {
                    formatter.success(&format!(
                        "Saved audit record at {}",
                        format_timestamp(timestamp)
                    ));
                    formatter.info(&format!("Server time: {}us", receipt.total_time));
                }
            }
            RecordCommand::Service {
                org,
                service,
                query,
            } => {
                let q = query.to_query()?;
                let records = client
                    .records_for_service(org, service, &q)
                    .await
                    .context("Failed to query audit records")?;
                print_records(formatter.as_ref(), opts, &records, q.limit)?;
            }
            RecordCommand::User { org, obo, query } => {
                let q = query.to_query()?;
                let records = client
                    .records_for_user(org, obo, &q)
                    .await
                    .context("Failed to query audit records")?;
                print_records(formatter.as_ref(), opts, &records, q.limit)?;
            }
        }

        Ok(())
    }
}

fn print_records(
    formatter: &dyn OutputFormatter,
    opts: &GlobalOptions,
    records: &[AuditRecord],
    limit: u32,
) -> Result<()> {
    if opts.format.is_json() {
        let json = serde_json::json!({
            "count": records.len(),
            "records": records,
        });
        formatter.print_json(&json);
        return Ok(());
    }

    if records.is_empty() {
        formatter.info("No audit records found for the specified criteria.");
        return Ok(());
    }

    formatter.success(&format!("Audit records ({} entries)", records.len()));
    formatter.info("");

    let mut table = Table::new(["Timestamp", "On behalf of", "Actor"]);
    for record in records {
        table.row([
            format_timestamp(record.timestamp),
            record.obo_id.clone(),
            record.actor_id.clone(),
        ]);
    }
    formatter.table(&table);

    if records.len() as u32 >= limit {
        formatter.info("");
        formatter.info(&format!(
            "Showing {} records (limit). Use --limit to show more.",
            limit
        ));
    }

    Ok(())
}

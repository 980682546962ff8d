//! Org command - Manage organisations
//!
//! Provides the `zenaudit org` CLI command which:
//! 1. Registers an organisation (or records new details for an existing id)
//! 2. Unregisters an organisation
//! 3. Lists organisations with their current status

use anyhow::{Context, Result};
use clap::Subcommand;
use tracing::info;
use zenaudit_client::types::OrganisationDetails;

use super::time::format_timestamp;
use super::GlobalOptions;
use crate::output::{get_formatter, Table};

/// Organisation subcommands
#[derive(Debug, Subcommand)]
pub enum OrgCommand {
    /// Register an organisation
    Register {
        /// Organisation name
        #[arg(long)]
        name: String,
        /// Contact address
        #[arg(long)]
        contact: String,
        /// Website
        #[arg(long)]
        website: String,
        /// Existing organisation id to update (a new id is generated otherwise)
        #[arg(long)]
        id: Option<String>,
    },
    /// Unregister an organisation
    Unregister {
        /// Organisation id
        id: String,
    },
    /// List organisations
    List,
}

impl OrgCommand {
    /// Execute the org command
    pub async fn execute(&self, opts: &GlobalOptions) -> Result<()> {
        let formatter = get_formatter(opts.format);
        let client = opts.client()?;

        match self {
            OrgCommand::Register {
                name,
                contact,
                website,
                id,
            } => {
                let details = OrganisationDetails {
                    name: name.clone(),
                    contact: contact.clone(),
                    website: website.clone(),
                };
                let registration = client
                    .register_organisation(id.as_deref(), &details)
                    .await
                    .context("Failed to register organisation")?;

                info!(org_id = %registration.id, "Registered organisation");

                if opts.format.is_json() {
                    formatter.print_json(&serde_json::to_value(&registration)?);
                } else {
                    formatter.success(&format!("Registered organisation '{}'", name));
                    formatter.info(&format!("ID: {}", registration.id));
                }
            }
            OrgCommand::Unregister { id } => {
                let unregistered = client
                    .unregister_organisation(id)
                    .await
                    .context("Failed to unregister organisation")?;

                if opts.format.is_json() {
                    formatter.print_json(&serde_json::to_value(&unregistered)?);
                } else {
                    formatter.success(&format!("Unregistered organisation {}", unregistered.id));
                }
            }
            OrgCommand::List => {
                let orgs = client
                    .list_organisations()
                    .await
                    .context("Failed to list organisations")?;

                if opts.format.is_json() {
                    formatter.print_json(&serde_json::to_value(&orgs)?);
                } else if orgs.is_empty() {
                    formatter.info("No organisations registered");
                } else {
                    formatter.success(&format!("{} organisation(s)", orgs.len()));
                    let mut table = Table::new(["ID", "Status", "Name", "Since"]);
                    for org in &orgs {
                        table.row([
                            org.org_id().to_string(),
                            org.status().to_string(),
                            org.name().unwrap_or("-").to_string(),
                            format_timestamp(org.timestamp()),
                        ]);
                    }
                    formatter.table(&table);
                }
            }
        }

        Ok(())
    }
}

//! Service command - Manage the services of an organisation

use anyhow::{Context, Result};
use clap::Subcommand;
use tracing::info;
use zenaudit_client::types::ServiceDetails;

use super::time::format_timestamp;
use super::GlobalOptions;
use crate::output::{get_formatter, Table};

/// Service subcommands
#[derive(Debug, Subcommand)]
pub enum ServiceCommand {
    /// Register a service under an organisation
    Register {
        /// Owning organisation id
        org: String,
        /// Service name
        #[arg(long)]
        name: String,
        /// Existing service id to update (a new id is generated otherwise)
        #[arg(long)]
        id: Option<String>,
    },
    /// Unregister a service
    Unregister {
        /// Owning organisation id
        org: String,
        /// Service id
        id: String,
    },
    /// List the services of an organisation
    List {
        /// Owning organisation id
        org: String,
    },
}

impl ServiceCommand {
    /// Execute the service command
    pub async fn execute(&self, opts: &GlobalOptions) -> Result<()> {
        let formatter = get_formatter(opts.format);
        let client = opts.client()?;

        match self {
            ServiceCommand::Register { org, name, id } => {
                let details = ServiceDetails { name: name.clone() };
                let registration = client
                    .register_service(org, id.as_deref(), &details)
                    .await
                    .context("Failed to register service")?;

                info!(org_id = %org, service_id = %registration.id, "Registered service");

                if opts.format.is_json() {
                    formatter.print_json(&serde_json::to_value(&registration)?);
                } else {
                    formatter.success(&format!("Registered service '{}' for {}", name, org));
                    formatter.info(&format!("ID: {}", registration.id));
                }
            }
            ServiceCommand::Unregister { org, id } => {
                let unregistered = client
                    .unregister_service(org, id)
                    .await
                    .context("Failed to unregister service")?;

                if opts.format.is_json() {
                    formatter.print_json(&serde_json::to_value(&unregistered)?);
                } else {
                    formatter.success(&format!(
                        "Unregistered service {} of {}",
                        unregistered.id, org
                    ));
                }
            }
            ServiceCommand::List { org } => {
                let services = client
                    .list_services(org)
                    .await
                    .context("Failed to list services")?;

                if opts.format.is_json() {
                    formatter.print_json(&serde_json::to_value(&services)?);
                } else if services.is_empty() {
                    formatter.info(&format!("No services registered for {}", org));
                } else {
                    formatter.success(&format!("{} service(s) for {}", services.len(), org));
                    let mut table = Table::new(["ID", "Status", "Name", "Since"]);
                    for service in &services {
                        table.row([
                            service.service_id().to_string(),
                            service.status().to_string(),
                            service.name().unwrap_or("-").to_string(),
                            format_timestamp(service.timestamp()),
                        ]);
                    }
                    formatter.table(&table);
                }
            }
        }

        Ok(())
    }
}

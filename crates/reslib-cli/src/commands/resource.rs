//! Resource inspection commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use crate::client::ApiClient;
use crate::output::{self, OutputFormat};
use reslib_core::error::AppError;
use reslib_core::types::ProjectId;
use reslib_entity::Resource;

/// Arguments for resource commands
#[derive(Debug, Args)]
pub struct ResourceArgs {
    /// Resource subcommand
    #[command(subcommand)]
    pub command: ResourceCommand,
}

/// Resource subcommands
#[derive(Debug, Subcommand)]
pub enum ResourceCommand {
    /// List resources
    List {
        /// Only resources associated with this project
        #[arg(short, long)]
        project: Option<String>,
    },
}

/// Resource display row
#[derive(Debug, Serialize, Tabled)]
struct ResourceRow {
    id: String,
    name: String,
    template: String,
    projects: usize,
    checked_out: u32,
    active: String,
}

/// Execute resource commands
pub async fn execute(
    args: &ResourceArgs,
    client: &ApiClient,
    format: OutputFormat,
) -> Result<(), AppError> {
    match &args.command {
        ResourceCommand::List { project } => {
            let resources: Vec<Resource> = match project {
                Some(raw) => {
                    let id: ProjectId = raw
                        .parse()
                        .map_err(|e| AppError::validation(format!("Invalid project ID: {}", e)))?;
                    client.get(&format!("resource/{}", id)).await?
                }
                None => client.get("resource").await?,
            };

            let rows: Vec<ResourceRow> = resources
                .iter()
                .map(|r| ResourceRow {
                    id: r.id.to_string(),
                    name: r.name.clone(),
                    template: r.template_id.to_string(),
                    projects: r.projects.len(),
                    checked_out: r.checked_out,
                    active: if r.active { "✓" } else { "✗" }.to_string(),
                })
                .collect();
            output::print_list(&rows, format);
        }
    }

    Ok(())
}

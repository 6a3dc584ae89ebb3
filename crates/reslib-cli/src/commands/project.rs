//! Project management commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use serde_json::json;
use tabled::Tabled;

use crate::client::ApiClient;
use crate::output::{self, OutputFormat};
use reslib_core::error::AppError;
use reslib_core::types::ProjectId;
use reslib_entity::Project;

/// Arguments for project commands
#[derive(Debug, Args)]
pub struct ProjectArgs {
    /// Project subcommand
    #[command(subcommand)]
    pub command: ProjectCommand,
}

/// Project subcommands
#[derive(Debug, Subcommand)]
pub enum ProjectCommand {
    /// List all projects
    List,
    /// Create a project and print its API key
    Create {
        /// Project name
        name: String,
    },
    /// Replace a project's API key
    RotateKey {
        /// Project ID
        id: String,
    },
}

/// Project display row
#[derive(Debug, Serialize, Tabled)]
struct ProjectRow {
    id: String,
    name: String,
    resources: usize,
    created_at: String,
}

/// Execute project commands
pub async fn execute(
    args: &ProjectArgs,
    client: &ApiClient,
    format: OutputFormat,
) -> Result<(), AppError> {
    match &args.command {
        ProjectCommand::List => {
            let projects: Vec<Project> = client.get("project").await?;
            let rows: Vec<ProjectRow> = projects
                .iter()
                .map(|p| ProjectRow {
                    id: p.id.to_string(),
                    name: p.name.clone(),
                    resources: p.resources.len(),
                    created_at: p.created_at.format("%Y-%m-%d %H:%M").to_string(),
                })
                .collect();
            output::print_list(&rows, format);
        }
        ProjectCommand::Create { name } => {
            let project: Project = client.post("project", &json!({ "name": name })).await?;
            output::print_success(&format!("Project '{}' created", project.name));
            output::print_item(&project, format);
        }
        ProjectCommand::RotateKey { id } => {
            let id: ProjectId = id
                .parse()
                .map_err(|e| AppError::validation(format!("Invalid project ID: {}", e)))?;
            let project: Project = client.put(&format!("project/{}/newkey", id)).await?;
            output::print_success(&format!("API key for '{}' rotated", project.name));
            output::print_kv("api_key", &project.api_key);
        }
    }

    Ok(())
}

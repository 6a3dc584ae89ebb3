//! Template inspection commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use crate::client::ApiClient;
use crate::output::{self, OutputFormat};
use reslib_core::error::AppError;
use reslib_entity::Template;

/// Arguments for template commands
#[derive(Debug, Args)]
pub struct TemplateArgs {
    /// Template subcommand
    #[command(subcommand)]
    pub command: TemplateCommand,
}

/// Template subcommands
#[derive(Debug, Subcommand)]
pub enum TemplateCommand {
    /// List all templates
    List,
}

#[derive(Debug, Serialize, Tabled)]
struct TemplateRow {
    id: String,
    name: String,
    fields: usize,
    description: String,
}

/// Execute template commands
pub async fn execute(
    args: &TemplateArgs,
    client: &ApiClient,
    format: OutputFormat,
) -> Result<(), AppError> {
    match &args.command {
        TemplateCommand::List => {
            let templates: Vec<Template> = client.get("template").await?;
            let rows: Vec<TemplateRow> = templates
                .iter()
                .map(|t| TemplateRow {
                    id: t.id.to_string(),
                    name: t.name.clone(),
                    fields: t.fields.len(),
                    description: t.description.clone(),
                })
                .collect();
            output::print_list(&rows, format);
        }
    }

    Ok(())
}

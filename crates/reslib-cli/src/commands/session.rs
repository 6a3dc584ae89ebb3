//! Session management commands.
//!
//! Closing goes through the server, which cancels the session's expiry job
//! and releases its holdings under the lease manager's locks.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use crate::client::ApiClient;
use crate::output::{self, OutputFormat};
use reslib_api::dto::response::SessionClosedResponse;
use reslib_core::error::AppError;
use reslib_core::types::SessionId;
use reslib_entity::Session;

/// Arguments for session commands
#[derive(Debug, Args)]
pub struct SessionArgs {
    /// Session subcommand
    #[command(subcommand)]
    pub command: SessionCommand,
}

/// Session subcommands
#[derive(Debug, Subcommand)]
pub enum SessionCommand {
    /// List live sessions
    List,
    /// Close a session and release everything it holds
    Close {
        /// Session ID
        id: String,
        /// Skip confirmation
        #[arg(long)]
        force: bool,
    },
}

/// Session display row
#[derive(Debug, Serialize, Tabled)]
struct SessionRow {
    id: String,
    project: String,
    resources: usize,
    consumed: usize,
    expires: String,
}

/// Execute session commands
pub async fn execute(
    args: &SessionArgs,
    client: &ApiClient,
    format: OutputFormat,
) -> Result<(), AppError> {
    match &args.command {
        SessionCommand::List => {
            let sessions: Vec<Session> = client.get("session").await?;
            let rows: Vec<SessionRow> = sessions
                .iter()
                .map(|s| SessionRow {
                    id: s.id.to_string(),
                    project: s.project.to_string(),
                    resources: s.resources.len(),
                    consumed: s.consumed.len(),
                    expires: s.expires_at.format("%Y-%m-%d %H:%M:%S").to_string(),
                })
                .collect();
            output::print_list(&rows, format);
        }
        SessionCommand::Close { id, force } => {
            let session_id: SessionId = id
                .parse()
                .map_err(|e| AppError::validation(format!("Invalid session ID: {}", e)))?;

            if !force {
                let confirm = dialoguer::Confirm::new()
                    .with_prompt(format!(
                        "Close session {} and release its resources?",
                        session_id
                    ))
                    .default(false)
                    .interact()
                    .map_err(|e| AppError::internal(format!("Input error: {}", e)))?;

                if !confirm {
                    println!("Cancelled.");
                    return Ok(());
                }
            }

            let closed: SessionClosedResponse =
                client.delete(&format!("session/{}", session_id)).await?;
            let report = closed.report;
            for failure in &report.failures {
                output::print_warning(&failure.to_string());
            }
            output::print_success(&format!(
                "Session {} closed ({} resources, {} units released)",
                session_id, report.released_resources, report.released_units
            ));
        }
    }

    Ok(())
}

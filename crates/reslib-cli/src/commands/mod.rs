//! CLI command definitions and dispatch.

pub mod migrate;
pub mod project;
pub mod resource;
pub mod serve;
pub mod session;
pub mod template;

use clap::{Parser, Subcommand};

use crate::client::ApiClient;
use crate::output::OutputFormat;
use reslib_core::config::AppConfig;
use reslib_core::error::AppError;

/// reslib: session-scoped resource leasing service
#[derive(Debug, Parser)]
#[command(name = "reslib", version, about, long_about = None)]
pub struct Cli {
    /// Configuration environment (defaults to $RESLIB_ENV, then "development")
    #[arg(short, long)]
    pub env: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Server URL for data commands (defaults to the configured bind address)
    #[arg(short, long, global = true)]
    pub server: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start the reslib server
    Serve(serve::ServeArgs),
    /// Database migration management
    Migrate(migrate::MigrateArgs),
    /// Template inspection
    Template(template::TemplateArgs),
    /// Project management
    Project(project::ProjectArgs),
    /// Resource inspection
    Resource(resource::ResourceArgs),
    /// Session management
    Session(session::SessionArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        let config = load_config(self.env.as_deref())?;
        match &self.command {
            Commands::Serve(args) => serve::execute(args, config).await,
            Commands::Migrate(args) => migrate::execute(args, &config).await,
            Commands::Template(args) => {
                template::execute(args, &self.client(&config)?, self.format).await
            }
            Commands::Project(args) => {
                project::execute(args, &self.client(&config)?, self.format).await
            }
            Commands::Resource(args) => {
                resource::execute(args, &self.client(&config)?, self.format).await
            }
            Commands::Session(args) => {
                session::execute(args, &self.client(&config)?, self.format).await
            }
        }
    }

    fn client(&self, config: &AppConfig) -> Result<ApiClient, AppError> {
        let client = ApiClient::from_config(config, self.server.as_deref())?;
        tracing::debug!(server = client.base_url(), "Using reslib server");
        Ok(client)
    }
}

/// Helper: load configuration for an explicit or ambient environment
pub fn load_config(env: Option<&str>) -> Result<AppConfig, AppError> {
    match env {
        Some(env) => AppConfig::load(env),
        None => AppConfig::load_from_env(),
    }
}

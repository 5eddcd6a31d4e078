//! Warden - a read-only SQL gateway with embedding-based schema search.

mod accessor;
mod classify;
mod cli;
mod config;
mod db;
mod error;
mod logging;
mod query;
mod search;

use std::time::Duration;

use accessor::DataAccessor;
use cli::{Cli, Command};
use config::{Config, DatabaseConfig};
use error::{Result, WardenError};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    logging::init_stderr_logging();

    if let Err(e) = run().await {
        error!("{}: {}", e.category(), e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse_args();

    // Connection settings precedence: CLI arguments, then config file, then
    // PG* environment variables.
    let connection = resolve_connection(&cli)?;
    info!("Connection: {}", connection.display_string());

    let mut accessor = DataAccessor::connect(&connection)
        .await?
        .with_query_timeout(Duration::from_secs(cli.timeout_secs));

    if let Command::Schema { top_k, .. } = &cli.command {
        accessor = accessor.with_schema_top_k(*top_k);
    }

    let outcome = dispatch(&cli, &accessor).await;
    accessor.close().await?;
    outcome
}

async fn dispatch(cli: &Cli, accessor: &DataAccessor) -> Result<()> {
    match &cli.command {
        Command::Query { sql } => {
            let result = accessor.execute_sql(sql).await?;
            let rendered = serde_json::to_string_pretty(&result)
                .map_err(|e| WardenError::execution(format!("Failed to render result: {e}")))?;
            println!("{rendered}");
        }
        Command::Schema { vector_file, .. } => {
            let content = std::fs::read_to_string(vector_file).map_err(|e| {
                WardenError::config(format!("Failed to read {}: {e}", vector_file.display()))
            })?;
            let query_vector: Vec<f32> = serde_json::from_str(&content).map_err(|e| {
                WardenError::config(format!(
                    "Invalid query vector in {}: {e}",
                    vector_file.display()
                ))
            })?;

            println!("{}", accessor.fetch_database_schema(&query_vector)?);
        }
    }

    Ok(())
}

/// Resolves the final connection configuration from CLI args, config file,
/// and environment.
fn resolve_connection(cli: &Cli) -> Result<DatabaseConfig> {
    let mut connection = cli.to_database_config()?;

    if connection.is_none() {
        let config_path = cli.config_path();
        info!("Loading config from: {}", config_path.display());
        let config = Config::load_from_file(&config_path)?;
        if config.database.host.is_some() || config.database.database.is_some() {
            let mut database = config.database;
            if let Some(schema) = &cli.schema {
                database.schema = schema.clone();
            }
            connection = Some(database);
        }
    }

    let mut connection = connection.unwrap_or_default();
    connection.apply_env_defaults();
    Ok(connection)
}

mod cli;
mod ddl;
mod describe;
mod error;
mod introspect;
mod schema;
#[cfg(test)]
mod testutil;

use std::fs;

use anyhow::Result;
use clap::Parser;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, SourceConfig};
use crate::ddl::DdlCatalog;
use crate::describe::describe;
use crate::error::CatalogError;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let options = cli.describe_options();

    let output = match cli.parse_source() {
        SourceConfig::Ddl(path) => {
            tracing::debug!("Loading DDL ({} dialect)...", cli.dialect);
            let catalog = DdlCatalog::from_path(&path, &cli.dialect)?;
            tracing::debug!("Found {} tables/views", catalog.len());
            describe(&catalog, &options)?
        }
        SourceConfig::Postgres(url) => {
            let schemas = cli.schema_list_or("public");
            tracing::debug!("Connecting to database...");
            let pool = PgPoolOptions::new()
                .max_connections(1)
                .connect(&url)
                .await
                .map_err(CatalogError::from)?;
            tracing::debug!("Introspecting schema...");
            let catalog = introspect::pg::introspect(&pool, &schemas).await;
            pool.close().await;
            let catalog = catalog?;
            tracing::debug!("Found {} tables/views", catalog.len());
            describe(&catalog, &options)?
        }
    };

    match cli.outfile {
        Some(ref path) => {
            fs::write(path, &output)?;
            tracing::info!("Output written to {path}");
        }
        None => {
            print!("{output}");
        }
    }

    Ok(())
}

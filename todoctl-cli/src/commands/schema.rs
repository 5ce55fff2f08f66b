//! Schema commands

use anyhow::Result;
use clap::{Parser, Subcommand};
use serde_json::json;
use todoctl_store::{latest_version, PgStore, TodoService};

use super::Output;

#[derive(Parser, Debug)]
pub struct SchemaArgs {
    #[command(subcommand)]
    pub command: SchemaCommands,
}

#[derive(Subcommand, Debug)]
pub enum SchemaCommands {
    /// Show the applied schema version (migrations run on every connect)
    Status,
}

pub async fn run_schema(
    args: SchemaArgs,
    service: &TodoService<PgStore>,
    out: Output,
) -> Result<()> {
    match args.command {
        SchemaCommands::Status => {
            let applied = service.backend().schema_version().await?;
            let latest = latest_version();
            let status = json!({
                "applied": applied,
                "latest": latest,
                "up_to_date": applied == Some(latest),
            });
            out.emit(&status, |_| match applied {
                Some(version) => println!("Schema version {} (latest {})", version, latest),
                None => println!("Schema not initialized (latest {})", latest),
            })
        }
    }
}

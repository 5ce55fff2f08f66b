//! todoctl CLI - lists, tasks and subtasks stored in PostgreSQL
//!
//! Each invocation loads configuration (environment, then `.env` files),
//! opens the store (connect + migrate, fatal on failure), performs one
//! operation, prints the result and closes the pool.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use todoctl_core::{load_dotenv, AppConfig, DatabaseConfig};
use todoctl_store::TodoService;
use tracing::debug;

mod commands;
mod tracing_setup;

use commands::lists::ListsArgs;
use commands::schema::SchemaArgs;
use commands::subtasks::SubtasksArgs;
use commands::tasks::TasksArgs;
use commands::Output;
use tracing_setup::TracingConfig;

#[derive(Parser, Debug)]
#[command(
    name = "todoctl",
    author,
    version,
    about = "Manage todo lists, tasks and subtasks stored in PostgreSQL",
    long_about = "Manage todo lists, tasks and subtasks stored in PostgreSQL. Connection settings \
                  come from DB_* environment variables (or DATABASE_URL), optionally loaded from \
                  ./.env or ~/.todoctl/.env."
)]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// Print results as JSON (for piping to jq)
    #[arg(long, global = true)]
    json: bool,

    /// Connection URL; overrides DATABASE_URL and the DB_* variables
    #[arg(long, global = true, value_name = "URL")]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List operations (create, get, all, rename, delete, reorder)
    Lists(ListsArgs),
    /// Task operations (create, get, by-list, all, update, toggle, delete)
    Tasks(TasksArgs),
    /// Subtask operations (create, get, by-task, all, update, toggle, delete)
    Subtasks(SubtasksArgs),
    /// Database schema management
    Schema(SchemaArgs),
    /// Generate shell completion scripts
    Completions(CompletionsArgs),
}

#[derive(Parser, Debug)]
struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    shell: Shell,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
#[allow(clippy::enum_variant_names)] // PowerShell is a proper noun, not a suffix
enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    load_dotenv();
    let app_config = AppConfig::from_env();
    tracing_setup::init(&TracingConfig {
        debug: cli.debug,
        log_level: app_config.log_level,
    })
    .ok();

    if let Commands::Completions(args) = cli.command {
        return run_completions(args);
    }

    // --database-url takes the place of DATABASE_URL, so DB_* fields are
    // not parsed when it is given.
    let cli_url = cli.database_url;
    let db_config = DatabaseConfig::from_lookup(|key| match key {
        "DATABASE_URL" => cli_url.clone().or_else(|| std::env::var(key).ok()),
        _ => std::env::var(key).ok(),
    })
    .context("Invalid database configuration")?;
    debug!(database = %db_config, "resolved database configuration");

    let service = TodoService::connect(&db_config)
        .await
        .context("Failed to open the todo store")?;

    let out = Output { json: cli.json };
    let result = match cli.command {
        Commands::Lists(args) => commands::run_lists(args, &service, out).await,
        Commands::Tasks(args) => commands::run_tasks(args, &service, out).await,
        Commands::Subtasks(args) => commands::run_subtasks(args, &service, out).await,
        Commands::Schema(args) => commands::run_schema(args, &service, out).await,
        Commands::Completions(_) => Ok(()),
    };

    service.close().await;
    result
}

fn run_completions(args: CompletionsArgs) -> Result<()> {
    use clap::CommandFactory;
    use clap_complete::{generate, Shell as CompletionShell};
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();

    let shell = match args.shell {
        Shell::Bash => CompletionShell::Bash,
        Shell::Zsh => CompletionShell::Zsh,
        Shell::Fish => CompletionShell::Fish,
        Shell::PowerShell => CompletionShell::PowerShell,
        Shell::Elvish => CompletionShell::Elvish,
    };

    generate(shell, &mut cmd, bin_name, &mut io::stdout());

    Ok(())
}

//! List commands: create, get, all, rename, delete, reorder

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use todoctl_core::List;
use todoctl_store::{Backend, TodoService};
use uuid::Uuid;

use super::Output;

#[derive(Parser, Debug)]
pub struct ListsArgs {
    #[command(subcommand)]
    pub command: ListCommands,
}

#[derive(Subcommand, Debug)]
pub enum ListCommands {
    /// Create a list at the end of the current order
    Create {
        /// List title (trimmed, 1-255 characters)
        title: String,
    },
    /// Show one list
    Get {
        /// List ID
        id: Uuid,
    },
    /// Show all lists in display order
    All,
    /// Change a list's title
    Rename {
        /// List ID
        id: Uuid,
        /// New title
        title: String,
    },
    /// Delete a list together with its tasks and subtasks
    Delete {
        /// List ID
        id: Uuid,
    },
    /// Rewrite list positions to follow the given order (1-based)
    Reorder {
        /// List IDs in their new order; unknown IDs are skipped
        ids: Vec<Uuid>,
    },
}

fn print_list(list: &List) {
    println!("{:>3}. {}  {}", list.position, list.title, list.id);
}

pub async fn run_lists<B: Backend>(
    args: ListsArgs,
    service: &TodoService<B>,
    out: Output,
) -> Result<()> {
    match args.command {
        ListCommands::Create { title } => {
            let list = service
                .create_list(&title)
                .await
                .context("Failed to create list")?;
            out.emit(&list, print_list)
        }
        ListCommands::Get { id } => {
            let list = service.get_list(id).await?;
            out.emit(&list, print_list)
        }
        ListCommands::All => {
            let lists = service.get_all_lists().await?;
            out.emit(&lists, |lists| {
                if lists.is_empty() {
                    println!("(no lists)");
                }
                lists.iter().for_each(print_list);
            })
        }
        ListCommands::Rename { id, title } => {
            let list = service
                .update_list(id, &title)
                .await
                .context("Failed to rename list")?;
            out.emit(&list, print_list)
        }
        ListCommands::Delete { id } => {
            service.delete_list(id).await?;
            out.deleted("list", id)
        }
        ListCommands::Reorder { ids } => {
            service
                .reorder_lists(&ids)
                .await
                .context("Failed to reorder lists")?;
            let lists = service.get_all_lists().await?;
            out.emit(&lists, |lists| lists.iter().for_each(print_list))
        }
    }
}

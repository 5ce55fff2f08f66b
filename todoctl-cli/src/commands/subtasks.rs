//! SubTask commands (same shape as task commands, scoped to a task)

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use todoctl_core::SubTask;
use todoctl_store::{Backend, TodoService};
use uuid::Uuid;

use super::{print_item, Output};

#[derive(Parser, Debug)]
pub struct SubtasksArgs {
    #[command(subcommand)]
    pub command: SubtaskCommands,
}

#[derive(Subcommand, Debug)]
pub enum SubtaskCommands {
    /// Create a subtask under a task
    Create {
        /// Owning task ID
        task_id: Uuid,
        /// Subtask name (trimmed, 1-255 characters)
        name: String,
        /// Optional free-text description
        #[arg(long, short)]
        description: Option<String>,
    },
    /// Show one subtask
    Get {
        /// Subtask ID
        id: Uuid,
    },
    /// Show the subtasks of one task, newest first
    ByTask {
        /// Task ID
        task_id: Uuid,
    },
    /// Show every subtask, newest first
    All,
    /// Replace a subtask's name, description and completion flag
    Update {
        /// Subtask ID
        id: Uuid,
        /// New name
        name: String,
        /// New description (omit to clear it)
        #[arg(long, short)]
        description: Option<String>,
        /// Mark the subtask completed
        #[arg(long)]
        completed: bool,
    },
    /// Flip a subtask between open and completed
    Toggle {
        /// Subtask ID
        id: Uuid,
    },
    /// Delete a subtask
    Delete {
        /// Subtask ID
        id: Uuid,
    },
}

fn print_subtask(subtask: &SubTask) {
    print_item(
        subtask.completed,
        &subtask.name,
        subtask.description.as_deref(),
        subtask.id,
    );
}

fn print_subtasks(subtasks: &[SubTask]) {
    if subtasks.is_empty() {
        println!("(no subtasks)");
    }
    subtasks.iter().for_each(print_subtask);
}

pub async fn run_subtasks<B: Backend>(
    args: SubtasksArgs,
    service: &TodoService<B>,
    out: Output,
) -> Result<()> {
    match args.command {
        SubtaskCommands::Create {
            task_id,
            name,
            description,
        } => {
            let subtask = service
                .create_subtask(task_id, &name, description.as_deref())
                .await
                .context("Failed to create subtask")?;
            out.emit(&subtask, print_subtask)
        }
        SubtaskCommands::Get { id } => {
            let subtask = service.get_subtask(id).await?;
            out.emit(&subtask, print_subtask)
        }
        SubtaskCommands::ByTask { task_id } => {
            let subtasks = service.get_subtasks_by_task_id(task_id).await?;
            out.emit(&subtasks, |subtasks| print_subtasks(subtasks))
        }
        SubtaskCommands::All => {
            let subtasks = service.get_all_subtasks().await?;
            out.emit(&subtasks, |subtasks| print_subtasks(subtasks))
        }
        SubtaskCommands::Update {
            id,
            name,
            description,
            completed,
        } => {
            let subtask = service
                .update_subtask(id, &name, description.as_deref(), completed)
                .await
                .context("Failed to update subtask")?;
            out.emit(&subtask, print_subtask)
        }
        SubtaskCommands::Toggle { id } => {
            let subtask = service.toggle_subtask_completion(id).await?;
            out.emit(&subtask, print_subtask)
        }
        SubtaskCommands::Delete { id } => {
            service.delete_subtask(id).await?;
            out.deleted("subtask", id)
        }
    }
}

//! Task commands

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use todoctl_core::Task;
use todoctl_store::{Backend, TodoService};
use uuid::Uuid;

use super::{print_item, Output};

#[derive(Parser, Debug)]
pub struct TasksArgs {
    #[command(subcommand)]
    pub command: TaskCommands,
}

#[derive(Subcommand, Debug)]
pub enum TaskCommands {
    /// Create a task in a list
    Create {
        /// Owning list ID
        list_id: Uuid,
        /// Task name (trimmed, 1-255 characters)
        name: String,
        /// Optional free-text description
        #[arg(long, short)]
        description: Option<String>,
    },
    /// Show one task
    Get {
        /// Task ID
        id: Uuid,
    },
    /// Show the tasks of one list, newest first
    ByList {
        /// List ID
        list_id: Uuid,
    },
    /// Show every task, newest first
    All,
    /// Replace a task's name, description and completion flag
    Update {
        /// Task ID
        id: Uuid,
        /// New name
        name: String,
        /// New description (omit to clear it)
        #[arg(long, short)]
        description: Option<String>,
        /// Mark the task completed
        #[arg(long)]
        completed: bool,
    },
    /// Flip a task between open and completed
    Toggle {
        /// Task ID
        id: Uuid,
    },
    /// Delete a task and its subtasks
    Delete {
        /// Task ID
        id: Uuid,
    },
}

fn print_task(task: &Task) {
    print_item(task.completed, &task.name, task.description.as_deref(), task.id);
}

fn print_tasks(tasks: &[Task]) {
    if tasks.is_empty() {
        println!("(no tasks)");
    }
    tasks.iter().for_each(print_task);
}

pub async fn run_tasks<B: Backend>(
    args: TasksArgs,
    service: &TodoService<B>,
    out: Output,
) -> Result<()> {
    match args.command {
        TaskCommands::Create {
            list_id,
            name,
            description,
        } => {
            let task = service
                .create_task(list_id, &name, description.as_deref())
                .await
                .context("Failed to create task")?;
            out.emit(&task, print_task)
        }
        TaskCommands::Get { id } => {
            let task = service.get_task(id).await?;
            out.emit(&task, print_task)
        }
        TaskCommands::ByList { list_id } => {
            let tasks = service.get_tasks_by_list_id(list_id).await?;
            out.emit(&tasks, |tasks| print_tasks(tasks))
        }
        TaskCommands::All => {
            let tasks = service.get_all_tasks().await?;
            out.emit(&tasks, |tasks| print_tasks(tasks))
        }
        TaskCommands::Update {
            id,
            name,
            description,
            completed,
        } => {
            let task = service
                .update_task(id, &name, description.as_deref(), completed)
                .await
                .context("Failed to update task")?;
            out.emit(&task, print_task)
        }
        TaskCommands::Toggle { id } => {
            let task = service.toggle_task_completion(id).await?;
            out.emit(&task, print_task)
        }
        TaskCommands::Delete { id } => {
            service.delete_task(id).await?;
            out.deleted("task", id)
        }
    }
}

//! Command implementations for the todoctl CLI
//!
//! Every command makes one call on `TodoService` and prints the result,
//! either human-readable or as pretty JSON (`--json`, for piping to jq).

pub mod lists;
pub mod schema;
pub mod subtasks;
pub mod tasks;

pub use lists::run_lists;
pub use schema::run_schema;
pub use subtasks::run_subtasks;
pub use tasks::run_tasks;

use anyhow::Result;
use serde::Serialize;
use serde_json::json;
use uuid::Uuid;

/// Output mode shared by all commands
#[derive(Debug, Clone, Copy)]
pub struct Output {
    pub json: bool,
}

impl Output {
    /// Print `value` as JSON, or hand it to `human` for text output.
    pub fn emit<T: Serialize + ?Sized>(&self, value: &T, human: impl FnOnce(&T)) -> Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            human(value);
        }
        Ok(())
    }

    pub fn deleted(&self, kind: &str, id: Uuid) -> Result<()> {
        self.emit(&json!({ "deleted": kind, "id": id }), |_| {
            println!("Deleted {} {}", kind, id);
        })
    }
}

/// One task or subtask line: checkbox, name, id, then the description indented.
pub(crate) fn print_item(completed: bool, name: &str, description: Option<&str>, id: Uuid) {
    let mark = if completed { "x" } else { " " };
    println!("[{}] {}  {}", mark, name, id);
    if let Some(description) = description {
        println!("    {}", description);
    }
}

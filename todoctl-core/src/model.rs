//! Entity values for the List → Task → SubTask hierarchy.
//!
//! Field names serialize the same way the desktop UI has always consumed
//! them (`task_name`, `subtask_name`, `list_id`, ...).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::validation::{normalize_description, ItemName, ValidationError};

/// A top-level list. `position` defines display order among lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct List {
    pub id: Uuid,
    pub title: String,
    pub position: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A task owned by a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: Uuid,
    pub list_id: Uuid,
    #[serde(rename = "task_name")]
    pub name: String,
    pub description: Option<String>,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A subtask owned by a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubTask {
    pub id: Uuid,
    pub task_id: Uuid,
    #[serde(rename = "subtask_name")]
    pub name: String,
    pub description: Option<String>,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a task or subtask
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemDraft {
    pub name: ItemName,
    pub description: Option<String>,
}

impl ItemDraft {
    pub fn new(name: &str, description: Option<&str>) -> Result<Self, ValidationError> {
        Ok(Self {
            name: ItemName::new(name)?,
            description: normalize_description(description),
        })
    }
}

/// Full replacement of a task's or subtask's mutable fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemUpdate {
    pub name: ItemName,
    /// `None` clears the stored description
    pub description: Option<String>,
    pub completed: bool,
}

impl ItemUpdate {
    pub fn new(
        name: &str,
        description: Option<&str>,
        completed: bool,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            name: ItemName::new(name)?,
            description: normalize_description(description),
            completed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn task_serializes_with_ui_field_names() {
        let now = DateTime::parse_from_rfc3339("2025-01-14T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let task = Task {
            id: Uuid::nil(),
            list_id: Uuid::nil(),
            name: "Buy milk".into(),
            description: None,
            completed: false,
            created_at: now,
            updated_at: now,
        };

        let value = serde_json::to_value(&task).unwrap();
        assert_eq!(value["task_name"], json!("Buy milk"));
        assert_eq!(value["list_id"], json!(Uuid::nil().to_string()));
        assert_eq!(value["description"], json!(null));
        assert!(value.get("name").is_none());
    }

    #[test]
    fn draft_normalizes_input() {
        let draft = ItemDraft::new("  2% milk ", Some("  ")).unwrap();
        assert_eq!(draft.name.as_str(), "2% milk");
        assert_eq!(draft.description, None);

        assert!(ItemDraft::new("", None).is_err());
        assert!(ItemUpdate::new(" ", Some("x"), true).is_err());
    }
}

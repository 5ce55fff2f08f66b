//! Error types for todoctl-store

use std::fmt;

use thiserror::Error;
use todoctl_core::ValidationError;
use uuid::Uuid;

pub type StoreResult<T> = Result<T, StoreError>;

/// Kind of entity an error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    List,
    Task,
    SubTask,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Entity::List => "list",
            Entity::Task => "task",
            Entity::SubTask => "subtask",
        })
    }
}

#[derive(Error, Debug)]
pub enum StoreError {
    /// Connection descriptor cannot be turned into connect options
    #[error("invalid connection settings: {reason}")]
    Config { reason: String },

    /// Database unreachable at construction
    #[error("failed to connect to database: {source}")]
    Connect {
        #[source]
        source: sqlx::Error,
    },

    /// A schema migration failed; the store is unusable
    #[error("failed to initialize schema: {source}")]
    Schema {
        #[source]
        source: sqlx::migrate::MigrateError,
    },

    #[error("{entity} with id {id} not found")]
    NotFound { entity: Entity, id: Uuid },

    /// Insert referenced a parent row that does not exist
    #[error("cannot create {entity}: {parent} with id {parent_id} does not exist")]
    MissingParent {
        entity: Entity,
        parent: Entity,
        parent_id: Uuid,
    },

    #[error("invalid input: {0}")]
    Validation(#[from] ValidationError),

    /// Any other statement or transaction failure
    #[error("failed to {op}{}: {source}", id_suffix(.id))]
    Query {
        op: &'static str,
        /// Row the statement addressed, when there is one
        id: Option<Uuid>,
        #[source]
        source: sqlx::Error,
    },
}

fn id_suffix(id: &Option<Uuid>) -> String {
    id.map(|id| format!(" (id {})", id)).unwrap_or_default()
}

impl StoreError {
    pub fn not_found(entity: Entity, id: Uuid) -> Self {
        Self::NotFound { entity, id }
    }

    /// Wrap a sqlx error with the name of the failed operation
    pub fn query(op: &'static str) -> impl FnOnce(sqlx::Error) -> Self {
        move |source| Self::Query {
            op,
            id: None,
            source,
        }
    }

    /// Like [`StoreError::query`], for statements addressing one row
    pub fn query_for(op: &'static str, id: Uuid) -> impl FnOnce(sqlx::Error) -> Self {
        move |source| Self::Query {
            op,
            id: Some(id),
            source,
        }
    }

    /// Map an insert failure, recognizing foreign-key violations on the parent
    pub fn insert(
        op: &'static str,
        entity: Entity,
        parent: Entity,
        parent_id: Uuid,
    ) -> impl FnOnce(sqlx::Error) -> Self {
        move |source| {
            let fk_violation = source
                .as_database_error()
                .is_some_and(|e| e.is_foreign_key_violation());
            if fk_violation {
                Self::MissingParent {
                    entity,
                    parent,
                    parent_id,
                }
            } else {
                Self::Query {
                    op,
                    id: Some(parent_id),
                    source,
                }
            }
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_missing_parent(&self) -> bool {
        matches!(self, Self::MissingParent { .. })
    }

    /// Startup failures: the owning process should not continue
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::Config { .. } | Self::Connect { .. } | Self::Schema { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let id = Uuid::nil();
        let err = StoreError::not_found(Entity::SubTask, id);
        assert_eq!(
            err.to_string(),
            format!("subtask with id {} not found", id)
        );
        assert!(err.is_not_found());
        assert!(!err.is_fatal());

        let err = StoreError::MissingParent {
            entity: Entity::Task,
            parent: Entity::List,
            parent_id: id,
        };
        assert!(err.to_string().starts_with("cannot create task: list with id"));
        assert!(err.is_missing_parent());
    }

    #[test]
    fn query_errors_keep_operation_context() {
        let err = StoreError::query("delete list")(sqlx::Error::PoolClosed);
        assert!(err.to_string().starts_with("failed to delete list:"));
        assert!(!err.is_not_found());
    }

    #[test]
    fn row_errors_name_the_row() {
        let id = Uuid::new_v4();
        let err = StoreError::query_for("update list position", id)(sqlx::Error::PoolClosed);
        assert!(err
            .to_string()
            .starts_with(&format!("failed to update list position (id {}):", id)));
        assert!(matches!(err, StoreError::Query { id: Some(found), .. } if found == id));
    }

    #[test]
    fn non_database_insert_errors_stay_query_errors() {
        let err = StoreError::insert("create task", Entity::Task, Entity::List, Uuid::nil())(
            sqlx::Error::PoolTimedOut,
        );
        assert!(matches!(
            err,
            StoreError::Query {
                op: "create task",
                id: Some(_),
                ..
            }
        ));
        assert!(err.to_string().contains(&Uuid::nil().to_string()));
    }

    #[test]
    fn validation_errors_convert() {
        let err: StoreError = ValidationError::Empty { field: "title" }.into();
        assert_eq!(err.to_string(), "invalid input: title cannot be empty");
    }

    #[test]
    fn startup_errors_are_fatal() {
        let err = StoreError::Config {
            reason: "bad url".into(),
        };
        assert!(err.is_fatal());
        let err = StoreError::Connect {
            source: sqlx::Error::PoolTimedOut,
        };
        assert!(err.is_fatal());
    }
}

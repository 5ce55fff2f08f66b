//! todoctl-core: shared types for the todoctl task manager
//!
//! - `model`: List / Task / SubTask values returned by every backend
//! - `validation`: validated titles and names, checked before any query runs
//! - `config`: connection descriptor and app settings sourced from the environment

pub mod config;
pub mod error;
pub mod model;
pub mod validation;

pub use config::{load_dotenv, AppConfig, DatabaseConfig, SslMode};
pub use error::{ConfigError, ConfigResult};
pub use model::{ItemDraft, ItemUpdate, List, SubTask, Task};
pub use validation::{ItemName, ListTitle, ValidationError};

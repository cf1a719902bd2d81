pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::storage::LocalStorage;
pub use app::batch::{BatchReport, BatchRunner};
#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::TomlConfig;
pub use crate::core::{engine::ToolEngine, registry::ToolRegistry};
pub use domain::model::{Category, FileArtifact, FileInput, ResultRow, ToolInput, ToolOutput, Value};
pub use utils::error::{Result, ToolError};

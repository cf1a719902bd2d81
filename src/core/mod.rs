pub mod dates;
pub mod engine;
pub mod finance;
pub mod image_ops;
pub mod numeral;
pub mod registry;
pub mod text;
pub mod units;

pub use crate::domain::model::{ToolInput, ToolOutput};
pub use crate::domain::ports::{ConfigProvider, Storage, Tool};
pub use crate::utils::error::Result;

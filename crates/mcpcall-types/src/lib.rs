//! Shared types and error hierarchy for mcpcall.

pub mod error;
pub mod tool;

pub use error::{ConfigError, HttpError, ToolCallError};
pub use tool::{ToolArguments, ToolCall};

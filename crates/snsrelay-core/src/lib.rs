//! Core types shared by SNS Relay crates
//!
//! This crate models the host side of the plugin contract: providers that
//! validate credentials, tools that yield messages, and a manager that routes
//! between them.

pub mod message;
pub mod plugin;

// Re-export commonly used types
pub use message::{raw_string_param, string_param, ParameterMap, ToolMessage};
pub use plugin::{PluginError, PluginFuture, PluginManager, Tool, ToolProvider, ToolRuntime};

// Re-export external dependencies
pub use serde_json;
pub use tracing;

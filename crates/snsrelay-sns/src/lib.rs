//! AWS SNS notification plugin
//!
//! This crate lets a host plugin framework:
//! - validate AWS credentials with a least-privileged STS identity check
//! - publish a notification to an existing SNS topic
//! - email a single recipient through a reusable relay topic

pub mod config;
pub mod credentials;
pub mod errors;
pub mod plugin;
pub mod providers;
pub mod services;

// Re-export main types
pub use config::{RegionPolicy, SnsPluginConfig, ValidationMode};
pub use credentials::CredentialBundle;
pub use errors::SnsError;
pub use plugin::{SendEmailTool, SnsPlugin};
pub use providers::{AwsClientFactory, IdentityApi, NotificationApi, SnsClientFactory};
pub use services::{
    CredentialValidator, DispatchOutcome, NotificationDispatcher, RelayTopic, SendRequest,
};

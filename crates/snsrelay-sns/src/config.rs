//! Plugin configuration

use serde::{Deserialize, Serialize};

/// Region used when credentials omit one and the policy allows a fallback
pub const DEFAULT_REGION: &str = "us-east-1";

/// Prefix for relay topics created for direct email delivery
pub const DEFAULT_RELAY_TOPIC_PREFIX: &str = "email-notification";

/// How far credential validation goes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationMode {
    /// Confirm the credentials with an STS caller identity check
    #[default]
    Remote,
    /// Structural checks only, no network access
    Lightweight,
}

/// Treatment of a blank region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegionPolicy {
    /// Substitute the configured default region
    #[default]
    Fallback,
    /// Reject the credentials
    Required,
}

/// Configuration for the SNS plugin
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnsPluginConfig {
    pub validation_mode: ValidationMode,
    pub region_policy: RegionPolicy,
    pub default_region: String,
    /// Run a best-effort SNS probe after a successful identity check
    pub probe_service: bool,
    pub relay_topic_prefix: String,
    /// Optional custom endpoint URL (for LocalStack or other AWS-compatible services)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint_url: Option<String>,
}

impl Default for SnsPluginConfig {
    fn default() -> Self {
        Self {
            validation_mode: ValidationMode::default(),
            region_policy: RegionPolicy::default(),
            default_region: DEFAULT_REGION.to_string(),
            probe_service: true,
            relay_topic_prefix: DEFAULT_RELAY_TOPIC_PREFIX.to_string(),
            endpoint_url: None,
        }
    }
}

impl SnsPluginConfig {
    /// Build the configuration from host-provided settings
    pub fn from_json(value: serde_json::Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    pub fn with_validation_mode(mut self, mode: ValidationMode) -> Self {
        self.validation_mode = mode;
        self
    }

    pub fn with_region_policy(mut self, policy: RegionPolicy) -> Self {
        self.region_policy = policy;
        self
    }

    pub fn with_probe_service(mut self, probe: bool) -> Self {
        self.probe_service = probe;
        self
    }
}

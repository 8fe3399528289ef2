//! AWS credential bundle supplied by the host

use snsrelay_core::{string_param, ParameterMap};

use crate::config::{RegionPolicy, SnsPluginConfig};
use crate::errors::SnsError;

pub const ACCESS_KEY_ID_KEY: &str = "aws_access_key_id";
pub const SECRET_ACCESS_KEY_KEY: &str = "aws_secret_access_key";
pub const REGION_KEY: &str = "aws_region";

pub(crate) const ACCESS_KEY_ID_LABEL: &str = "AWS Access Key ID";
pub(crate) const SECRET_ACCESS_KEY_LABEL: &str = "AWS Secret Access Key";
pub(crate) const REGION_LABEL: &str = "AWS Region";

/// AWS credentials for a single validation or dispatch call.
///
/// Fields are trimmed on construction; a blank field is stored as an empty string.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct CredentialBundle {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub region: String,
}

impl CredentialBundle {
    pub fn new(
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
        region: impl Into<String>,
    ) -> Self {
        Self {
            access_key_id: access_key_id.into().trim().to_string(),
            secret_access_key: secret_access_key.into().trim().to_string(),
            region: region.into().trim().to_string(),
        }
    }

    /// Read the bundle from the host's credential mapping
    pub fn from_map(credentials: &ParameterMap) -> Self {
        Self {
            access_key_id: string_param(credentials, ACCESS_KEY_ID_KEY).unwrap_or_default(),
            secret_access_key: string_param(credentials, SECRET_ACCESS_KEY_KEY)
                .unwrap_or_default(),
            region: string_param(credentials, REGION_KEY).unwrap_or_default(),
        }
    }

    /// Check required fields in order and apply the region policy.
    ///
    /// Returns the bundle the remote clients should use.
    pub fn resolve(&self, config: &SnsPluginConfig) -> Result<CredentialBundle, SnsError> {
        if self.access_key_id.trim().is_empty() {
            return Err(SnsError::MissingField(ACCESS_KEY_ID_LABEL));
        }
        if self.secret_access_key.trim().is_empty() {
            return Err(SnsError::MissingField(SECRET_ACCESS_KEY_LABEL));
        }

        let region = match (self.region.trim(), config.region_policy) {
            ("", RegionPolicy::Required) => return Err(SnsError::MissingField(REGION_LABEL)),
            ("", RegionPolicy::Fallback) => config.default_region.clone(),
            (region, _) => region.to_string(),
        };

        Ok(CredentialBundle::new(
            self.access_key_id.as_str(),
            self.secret_access_key.as_str(),
            region,
        ))
    }
}

impl std::fmt::Debug for CredentialBundle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialBundle")
            .field("access_key_id", &mask_string(&self.access_key_id))
            .field("secret_access_key", &"***")
            .field("region", &self.region)
            .finish()
    }
}

/// Mask a string, showing only first 4 and last 4 characters
pub(crate) fn mask_string(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    if chars.len() <= 8 {
        "***".to_string()
    } else {
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{}...{}", head, tail)
    }
}

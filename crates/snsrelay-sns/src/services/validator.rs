//! Credential validation
//!
//! Structural checks always run first and never touch the network. In remote
//! mode the credentials are then confirmed with STS `GetCallerIdentity`, which
//! works without any SNS permission.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::{SnsPluginConfig, ValidationMode};
use crate::credentials::{CredentialBundle, ACCESS_KEY_ID_LABEL, SECRET_ACCESS_KEY_LABEL};
use crate::errors::{authentication_reason, SnsError};
use crate::providers::{NotificationApi, SnsClientFactory};

/// Shortest plausible access key ID
pub const MIN_ACCESS_KEY_ID_LEN: usize = 16;

/// Shortest plausible secret access key
pub const MIN_SECRET_ACCESS_KEY_LEN: usize = 30;

/// Result of the best-effort SNS probe. Recorded for logging only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    Skipped,
    Reachable,
    Unreachable(String),
}

pub struct CredentialValidator {
    clients: Arc<dyn SnsClientFactory>,
    config: SnsPluginConfig,
}

impl CredentialValidator {
    pub fn new(clients: Arc<dyn SnsClientFactory>, config: SnsPluginConfig) -> Self {
        Self { clients, config }
    }

    /// Validate a credential bundle.
    ///
    /// Returns the bundle to use for remote calls, with the region policy applied.
    pub async fn validate(&self, bundle: &CredentialBundle) -> Result<CredentialBundle, SnsError> {
        let resolved = bundle.resolve(&self.config)?;

        match self.config.validation_mode {
            ValidationMode::Lightweight => {
                check_lengths(&resolved)?;
                debug!("Credentials passed structural checks: {:?}", resolved);
            }
            ValidationMode::Remote => {
                self.check_identity(&resolved).await?;

                let probe = self.probe_service(&resolved).await;
                debug!("SNS probe result (ignored): {:?}", probe);
            }
        }

        info!("AWS credentials accepted for region {}", resolved.region);
        Ok(resolved)
    }

    async fn check_identity(&self, credentials: &CredentialBundle) -> Result<(), SnsError> {
        let identity_client = self.clients.identity_client(credentials).await;

        match identity_client.get_caller_identity().await {
            Ok(identity) => {
                debug!(
                    "Caller identity confirmed: account={:?} arn={:?}",
                    identity.account, identity.arn
                );
                Ok(())
            }
            Err(e) => {
                let err = classify_identity_error(e);
                warn!("AWS credentials rejected: {}", err);
                Err(err)
            }
        }
    }

    /// Best-effort check that SNS answers with these credentials.
    ///
    /// The outcome is returned for logging and must not influence validation.
    async fn probe_service(&self, credentials: &CredentialBundle) -> ProbeOutcome {
        if !self.config.probe_service {
            return ProbeOutcome::Skipped;
        }

        let sns: Arc<dyn NotificationApi> = self.clients.notification_client(credentials).await;
        match sns.list_topics(None).await {
            Ok(_) => ProbeOutcome::Reachable,
            Err(e) => ProbeOutcome::Unreachable(e.to_string()),
        }
    }
}

fn check_lengths(credentials: &CredentialBundle) -> Result<(), SnsError> {
    if credentials.access_key_id.chars().count() < MIN_ACCESS_KEY_ID_LEN {
        return Err(SnsError::MalformedCredential(ACCESS_KEY_ID_LABEL));
    }
    if credentials.secret_access_key.chars().count() < MIN_SECRET_ACCESS_KEY_LEN {
        return Err(SnsError::MalformedCredential(SECRET_ACCESS_KEY_LABEL));
    }
    Ok(())
}

/// Promote authentication-class service errors; everything else passes through
fn classify_identity_error(err: SnsError) -> SnsError {
    match err {
        SnsError::RemoteServiceError { code, message } => match authentication_reason(&code) {
            Some(reason) => SnsError::AuthenticationFailure {
                code,
                reason: reason.to_string(),
            },
            None => SnsError::RemoteServiceError { code, message },
        },
        other => other,
    }
}

//! Notification dispatch
//!
//! A send request goes either to an existing topic or, for a bare email
//! address, through a relay topic the recipient is subscribed to. Every
//! failure is reported in the returned [`DispatchOutcome`]; nothing is retried
//! and partial progress (a created topic or subscription) is kept for reuse.

use std::sync::Arc;

use snsrelay_core::{raw_string_param, string_param, ParameterMap};
use tracing::{debug, error, info, warn};

use crate::config::SnsPluginConfig;
use crate::credentials::CredentialBundle;
use crate::errors::SnsError;
use crate::providers::{NotificationApi, PublishRequest, SnsClientFactory, EMAIL_PROTOCOL};
use crate::services::relay::{relay_topic_name, resolve_relay_topic};

pub const NO_TARGET_STATUS: &str = "Either topic_arn or email must be provided.";
pub const NO_SUBJECT_STATUS: &str = "Subject is required.";
pub const NO_MESSAGE_STATUS: &str = "Message is required.";
pub const NO_CREDENTIALS_STATUS: &str = "AWS credentials are not configured.";
pub const SENT_STATUS: &str = "Email sent successfully";
pub const CONFIRMATION_NOTE: &str =
    "The recipient must confirm the subscription first if this is their first notification.";

/// A single notification to deliver
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SendRequest {
    pub topic_arn: Option<String>,
    pub email: Option<String>,
    pub subject: String,
    pub message: String,
}

impl SendRequest {
    /// Read the request from the host's parameter mapping
    pub fn from_map(params: &ParameterMap) -> Self {
        Self {
            topic_arn: string_param(params, "topic_arn"),
            email: string_param(params, "email"),
            subject: string_param(params, "subject").unwrap_or_default(),
            message: raw_string_param(params, "message").unwrap_or_default(),
        }
    }

    fn usable(value: &Option<String>) -> Option<&str> {
        value.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    pub fn topic_arn(&self) -> Option<&str> {
        Self::usable(&self.topic_arn)
    }

    pub fn email(&self) -> Option<&str> {
        Self::usable(&self.email)
    }

    /// Structural checks, in reporting order
    fn check(&self) -> Result<(), &'static str> {
        if self.topic_arn().is_none() && self.email().is_none() {
            return Err(NO_TARGET_STATUS);
        }
        if self.subject.trim().is_empty() {
            return Err(NO_SUBJECT_STATUS);
        }
        if self.message.trim().is_empty() {
            return Err(NO_MESSAGE_STATUS);
        }
        Ok(())
    }
}

/// Result of one dispatch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchOutcome {
    pub success: bool,
    pub message_id: Option<String>,
    pub status_text: String,
    /// Topic the message was published to
    pub topic_arn: Option<String>,
    /// Email subscription created on the relay topic
    pub subscription_arn: Option<String>,
}

impl DispatchOutcome {
    pub fn failure(status_text: impl Into<String>) -> Self {
        Self {
            success: false,
            message_id: None,
            status_text: status_text.into(),
            topic_arn: None,
            subscription_arn: None,
        }
    }

    fn published(message_id: String, topic_arn: String, status_text: String) -> Self {
        Self {
            success: true,
            message_id: Some(message_id),
            status_text,
            topic_arn: Some(topic_arn),
            subscription_arn: None,
        }
    }

    /// Whether delivery went through an email relay subscription
    pub fn via_relay(&self) -> bool {
        self.subscription_arn.is_some()
    }
}

fn topic_failure_status(err: &SnsError) -> String {
    match err {
        SnsError::ResourceNotFound(_) | SnsError::UnexpectedError(_) => err.to_string(),
        SnsError::ConnectionError(detail) => format!("AWS connection error: {}", detail),
        SnsError::RemoteServiceError { code, message } => {
            format!("AWS SNS error: {} - {}", code, message)
        }
        other => format!("AWS SNS error: {}", other),
    }
}

pub struct NotificationDispatcher {
    clients: Arc<dyn SnsClientFactory>,
    config: SnsPluginConfig,
}

impl NotificationDispatcher {
    pub fn new(clients: Arc<dyn SnsClientFactory>, config: SnsPluginConfig) -> Self {
        Self { clients, config }
    }

    /// Deliver one notification. Never fails; failures are reported in the outcome.
    pub async fn dispatch(
        &self,
        bundle: &CredentialBundle,
        request: &SendRequest,
    ) -> DispatchOutcome {
        if let Err(status) = request.check() {
            debug!("Rejected send request: {}", status);
            return DispatchOutcome::failure(status);
        }

        let credentials = match bundle.resolve(&self.config) {
            Ok(credentials) => credentials,
            Err(e) => {
                debug!("Credentials incomplete: {}", e);
                return DispatchOutcome::failure(NO_CREDENTIALS_STATUS);
            }
        };

        let sns = self.clients.notification_client(&credentials).await;

        let outcome = match (request.topic_arn(), request.email()) {
            (Some(topic_arn), _) => self.publish_to_topic(sns.as_ref(), topic_arn, request).await,
            (None, Some(email)) => self.send_via_relay(sns.as_ref(), email, request).await,
            (None, None) => DispatchOutcome::failure(NO_TARGET_STATUS),
        };

        if outcome.success {
            info!(
                "Notification published to {:?}, message_id={:?}",
                outcome.topic_arn, outcome.message_id
            );
        } else {
            warn!("Notification failed: {}", outcome.status_text);
        }

        outcome
    }

    async fn publish_to_topic(
        &self,
        sns: &dyn NotificationApi,
        topic_arn: &str,
        request: &SendRequest,
    ) -> DispatchOutcome {
        let publish = PublishRequest {
            topic_arn,
            subject: &request.subject,
            message: &request.message,
        };

        let result = sns.publish(&publish).await.map_err(|e| match e {
            SnsError::RemoteServiceError { ref code, .. } if code == "NotFound" => {
                SnsError::ResourceNotFound(topic_arn.to_string())
            }
            other => other,
        });

        match result {
            Ok(message_id) => DispatchOutcome::published(
                message_id,
                topic_arn.to_string(),
                SENT_STATUS.to_string(),
            ),
            Err(e) => {
                if matches!(e, SnsError::UnexpectedError(_)) {
                    error!("Unexpected failure publishing to {}: {}", topic_arn, e);
                }
                DispatchOutcome::failure(topic_failure_status(&e))
            }
        }
    }

    async fn send_via_relay(
        &self,
        sns: &dyn NotificationApi,
        email: &str,
        request: &SendRequest,
    ) -> DispatchOutcome {
        match self.relay(sns, email, request).await {
            Ok(outcome) => outcome,
            Err(e) => {
                if matches!(e, SnsError::UnexpectedError(_)) {
                    error!("Unexpected failure sending email to {}: {}", email, e);
                }
                DispatchOutcome::failure(format!("Error sending email: {}", e))
            }
        }
    }

    async fn relay(
        &self,
        sns: &dyn NotificationApi,
        email: &str,
        request: &SendRequest,
    ) -> Result<DispatchOutcome, SnsError> {
        let name = relay_topic_name(&self.config.relay_topic_prefix, email);
        let topic = resolve_relay_topic(sns, &name).await?;

        let subscription_arn = sns.subscribe(&topic.arn, EMAIL_PROTOCOL, email).await?;
        debug!("Subscription for {}: {}", email, subscription_arn);

        let message_id = sns
            .publish(&PublishRequest {
                topic_arn: &topic.arn,
                subject: &request.subject,
                message: &request.message,
            })
            .await?;

        let mut outcome = DispatchOutcome::published(
            message_id,
            topic.arn,
            format!("{}. {}", SENT_STATUS, CONFIRMATION_NOTE),
        );
        outcome.subscription_arn = Some(subscription_arn);
        Ok(outcome)
    }
}

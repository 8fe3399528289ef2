//! Remote API abstractions used by the validator and dispatcher

use std::sync::Arc;

use async_trait::async_trait;
use crate::credentials::CredentialBundle;
use crate::errors::SnsError;

/// Delivery protocol used for relay-topic subscriptions
pub const EMAIL_PROTOCOL: &str = "email";

/// Identity behind a set of credentials
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerIdentity {
    pub account: Option<String>,
    pub arn: Option<String>,
    pub user_id: Option<String>,
}

/// One page of a topic listing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopicPage {
    pub topic_arns: Vec<String>,
    pub next_token: Option<String>,
}

/// Request to publish a message to a topic
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishRequest<'a> {
    pub topic_arn: &'a str,
    pub subject: &'a str,
    pub message: &'a str,
}

/// Least-privileged identity check
#[async_trait]
pub trait IdentityApi: Send + Sync {
    /// Return the identity the credentials belong to
    async fn get_caller_identity(&self) -> Result<CallerIdentity, SnsError>;
}

/// The SNS operations this plugin needs
#[async_trait]
pub trait NotificationApi: Send + Sync {
    /// Create a topic (or return the existing one) and return its ARN
    async fn create_topic(&self, name: &str) -> Result<String, SnsError>;

    /// List one page of topics
    async fn list_topics(&self, next_token: Option<String>) -> Result<TopicPage, SnsError>;

    /// Subscribe an endpoint and return the subscription ARN
    async fn subscribe(
        &self,
        topic_arn: &str,
        protocol: &str,
        endpoint: &str,
    ) -> Result<String, SnsError>;

    /// Publish a message and return its message ID
    async fn publish(&self, request: &PublishRequest<'_>) -> Result<String, SnsError>;
}

/// Builds remote clients bound to one set of credentials
#[async_trait]
pub trait SnsClientFactory: Send + Sync {
    async fn identity_client(&self, credentials: &CredentialBundle) -> Arc<dyn IdentityApi>;

    async fn notification_client(
        &self,
        credentials: &CredentialBundle,
    ) -> Arc<dyn NotificationApi>;
}

//! AWS SDK implementations of the remote APIs

use std::sync::Arc;

use async_trait::async_trait;
use aws_config::retry::RetryConfig;
use aws_config::{BehaviorVersion, SdkConfig};
use aws_sdk_sns::config::{Credentials, Region};
use aws_sdk_sns::error::{ProvideErrorMetadata, SdkError};
use tracing::{debug, error};

use super::traits::{
    CallerIdentity, IdentityApi, NotificationApi, PublishRequest, SnsClientFactory, TopicPage,
};
use crate::credentials::CredentialBundle;
use crate::errors::SnsError;

const CREDENTIALS_PROVIDER_NAME: &str = "snsrelay";

/// Turn an AWS SDK error into the plugin's error taxonomy.
///
/// Service errors keep their code and message verbatim.
pub(crate) fn classify_sdk_error<E, R>(service: &str, err: SdkError<E, R>) -> SnsError
where
    E: ProvideErrorMetadata + std::fmt::Debug,
    R: std::fmt::Debug,
{
    match &err {
        SdkError::ServiceError(service_err) => {
            let err = service_err.err();
            SnsError::remote(
                err.code().unwrap_or("Unknown"),
                err.message().unwrap_or("No message"),
            )
        }
        SdkError::TimeoutError(_) => {
            SnsError::ConnectionError(format!("Request to AWS {} timed out", service))
        }
        SdkError::DispatchFailure(dispatch_err) => {
            if dispatch_err.is_io() {
                SnsError::ConnectionError(format!(
                    "Unable to connect to AWS {}: {:?}",
                    service, dispatch_err
                ))
            } else if dispatch_err.is_timeout() {
                SnsError::ConnectionError(format!("Connection to AWS {} timed out", service))
            } else if dispatch_err.is_user() {
                SnsError::UnexpectedError(format!("Configuration error: {:?}", dispatch_err))
            } else {
                SnsError::ConnectionError(format!("Connection failed: {:?}", dispatch_err))
            }
        }
        SdkError::ConstructionFailure(_) => {
            SnsError::UnexpectedError(format!("Invalid request configuration: {:?}", err))
        }
        SdkError::ResponseError(resp_err) => SnsError::UnexpectedError(format!(
            "Unexpected response from AWS {}: {:?}",
            service, resp_err
        )),
        _ => SnsError::UnexpectedError(format!("{:?}", err)),
    }
}

/// STS-backed identity check
pub struct AwsIdentityClient {
    client: aws_sdk_sts::Client,
}

impl AwsIdentityClient {
    pub fn new(config: &SdkConfig) -> Self {
        Self {
            client: aws_sdk_sts::Client::new(config),
        }
    }
}

#[async_trait]
impl IdentityApi for AwsIdentityClient {
    async fn get_caller_identity(&self) -> Result<CallerIdentity, SnsError> {
        debug!("Calling STS GetCallerIdentity");

        let output = self
            .client
            .get_caller_identity()
            .send()
            .await
            .map_err(|e| classify_sdk_error("STS", e))?;

        Ok(CallerIdentity {
            account: output.account().map(str::to_string),
            arn: output.arn().map(str::to_string),
            user_id: output.user_id().map(str::to_string),
        })
    }
}

/// SNS client bound to one set of credentials
pub struct AwsSnsClient {
    client: aws_sdk_sns::Client,
}

impl AwsSnsClient {
    pub fn new(config: &SdkConfig) -> Self {
        Self {
            client: aws_sdk_sns::Client::new(config),
        }
    }
}

#[async_trait]
impl NotificationApi for AwsSnsClient {
    async fn create_topic(&self, name: &str) -> Result<String, SnsError> {
        debug!("Creating SNS topic: {}", name);

        let output = self
            .client
            .create_topic()
            .name(name)
            .send()
            .await
            .map_err(|e| classify_sdk_error("SNS", e))?;

        output
            .topic_arn()
            .map(str::to_string)
            .ok_or_else(|| SnsError::UnexpectedError("No topic ARN returned".to_string()))
    }

    async fn list_topics(&self, next_token: Option<String>) -> Result<TopicPage, SnsError> {
        let output = self
            .client
            .list_topics()
            .set_next_token(next_token)
            .send()
            .await
            .map_err(|e| classify_sdk_error("SNS", e))?;

        Ok(TopicPage {
            topic_arns: output
                .topics()
                .iter()
                .filter_map(|topic| topic.topic_arn().map(str::to_string))
                .collect(),
            next_token: output.next_token().map(str::to_string),
        })
    }

    async fn subscribe(
        &self,
        topic_arn: &str,
        protocol: &str,
        endpoint: &str,
    ) -> Result<String, SnsError> {
        debug!("Subscribing {} endpoint to {}", protocol, topic_arn);

        let output = self
            .client
            .subscribe()
            .topic_arn(topic_arn)
            .protocol(protocol)
            .endpoint(endpoint)
            .return_subscription_arn(true)
            .send()
            .await
            .map_err(|e| classify_sdk_error("SNS", e))?;

        output
            .subscription_arn()
            .map(str::to_string)
            .ok_or_else(|| SnsError::UnexpectedError("No subscription ARN returned".to_string()))
    }

    async fn publish(&self, request: &PublishRequest<'_>) -> Result<String, SnsError> {
        debug!("Publishing message to {}", request.topic_arn);

        let output = self
            .client
            .publish()
            .topic_arn(request.topic_arn)
            .subject(request.subject)
            .message(request.message)
            .send()
            .await
            .map_err(|e| {
                let err = classify_sdk_error("SNS", e);
                error!("Failed to publish to {}: {}", request.topic_arn, err);
                err
            })?;

        output
            .message_id()
            .map(str::to_string)
            .ok_or_else(|| SnsError::UnexpectedError("No message ID returned".to_string()))
    }
}

/// Builds AWS SDK clients from a credential bundle
#[derive(Debug, Clone, Default)]
pub struct AwsClientFactory {
    /// Optional custom endpoint URL (for LocalStack or other AWS-compatible services)
    endpoint_url: Option<String>,
}

impl AwsClientFactory {
    pub fn new(endpoint_url: Option<String>) -> Self {
        Self { endpoint_url }
    }

    async fn load_config(&self, credentials: &CredentialBundle) -> SdkConfig {
        let creds = Credentials::new(
            &credentials.access_key_id,
            &credentials.secret_access_key,
            None,
            None,
            CREDENTIALS_PROVIDER_NAME,
        );

        let mut config_builder = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(credentials.region.clone()))
            .credentials_provider(creds)
            .retry_config(RetryConfig::disabled());

        if let Some(ref endpoint_url) = self.endpoint_url {
            config_builder = config_builder.endpoint_url(endpoint_url);
        }

        config_builder.load().await
    }
}

#[async_trait]
impl SnsClientFactory for AwsClientFactory {
    async fn identity_client(&self, credentials: &CredentialBundle) -> Arc<dyn IdentityApi> {
        let config = self.load_config(credentials).await;
        Arc::new(AwsIdentityClient::new(&config))
    }

    async fn notification_client(
        &self,
        credentials: &CredentialBundle,
    ) -> Arc<dyn NotificationApi> {
        let config = self.load_config(credentials).await;
        Arc::new(AwsSnsClient::new(&config))
    }
}

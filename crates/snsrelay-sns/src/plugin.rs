//! SNS plugin: provider credentials check and the `send_email` tool

use std::sync::Arc;

use serde_json::json;
use snsrelay_core::{
    ParameterMap, PluginError, PluginFuture, Tool, ToolMessage, ToolProvider, ToolRuntime,
};
use tracing::debug;

use crate::config::SnsPluginConfig;
use crate::credentials::CredentialBundle;
use crate::providers::{AwsClientFactory, SnsClientFactory};
use crate::services::dispatcher::CONFIRMATION_NOTE;
use crate::services::{
    CredentialValidator, DispatchOutcome, NotificationDispatcher, SendRequest,
};

pub const PROVIDER_NAME: &str = "aws_sns";
pub const SEND_EMAIL_TOOL: &str = "send_email";

/// Provider exposing AWS SNS publishing to the host
pub struct SnsPlugin {
    validator: CredentialValidator,
    send_email: Arc<SendEmailTool>,
}

impl SnsPlugin {
    /// Create the plugin backed by the AWS SDK
    pub fn new(config: SnsPluginConfig) -> Self {
        let clients = Arc::new(AwsClientFactory::new(config.endpoint_url.clone()));
        Self::with_clients(clients, config)
    }

    /// Create the plugin with a custom client factory
    pub fn with_clients(clients: Arc<dyn SnsClientFactory>, config: SnsPluginConfig) -> Self {
        let validator = CredentialValidator::new(clients.clone(), config.clone());
        let dispatcher = Arc::new(NotificationDispatcher::new(clients, config));

        Self {
            validator,
            send_email: Arc::new(SendEmailTool::new(dispatcher)),
        }
    }
}

impl Default for SnsPlugin {
    fn default() -> Self {
        Self::new(SnsPluginConfig::default())
    }
}

impl ToolProvider for SnsPlugin {
    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }

    fn validate_credentials<'a>(
        &'a self,
        credentials: &'a ParameterMap,
    ) -> PluginFuture<'a, Result<(), PluginError>> {
        Box::pin(async move {
            let bundle = CredentialBundle::from_map(credentials);
            self.validator
                .validate(&bundle)
                .await
                .map(|_| ())
                .map_err(|e| PluginError::CredentialValidation(e.to_string()))
        })
    }

    fn tools(&self) -> Vec<Arc<dyn Tool>> {
        vec![self.send_email.clone()]
    }
}

/// Sends one notification to a topic or an email address
pub struct SendEmailTool {
    dispatcher: Arc<NotificationDispatcher>,
}

impl SendEmailTool {
    pub fn new(dispatcher: Arc<NotificationDispatcher>) -> Self {
        Self { dispatcher }
    }
}

impl Tool for SendEmailTool {
    fn name(&self) -> &'static str {
        SEND_EMAIL_TOOL
    }

    fn invoke<'a>(
        &'a self,
        runtime: &'a ToolRuntime,
        params: &'a ParameterMap,
    ) -> PluginFuture<'a, Vec<ToolMessage>> {
        Box::pin(async move {
            let bundle = CredentialBundle::from_map(&runtime.credentials);
            let request = SendRequest::from_map(params);

            let outcome = self.dispatcher.dispatch(&bundle, &request).await;
            debug!("send_email finished: success={}", outcome.success);

            render_outcome(&request, &outcome)
        })
    }
}

/// Turn an outcome into host messages: text, then the result object, then the
/// `message_id` variable on success.
pub fn render_outcome(request: &SendRequest, outcome: &DispatchOutcome) -> Vec<ToolMessage> {
    if !outcome.success {
        return vec![
            ToolMessage::text(format!("Error: {}", outcome.status_text)),
            ToolMessage::json(json!({
                "success": false,
                "status": outcome.status_text,
            })),
        ];
    }

    let text = match (outcome.via_relay(), request.email()) {
        (true, Some(email)) => format!("Message sent to {}. Note: {}", email, CONFIRMATION_NOTE),
        _ => format!(
            "Message successfully published to topic: {}",
            outcome.topic_arn.as_deref().unwrap_or_default()
        ),
    };
    let message_id = outcome.message_id.clone().unwrap_or_default();

    vec![
        ToolMessage::text(text),
        ToolMessage::json(json!({
            "success": true,
            "message_id": message_id,
            "status": outcome.status_text,
        })),
        ToolMessage::variable("message_id", message_id),
    ]
}

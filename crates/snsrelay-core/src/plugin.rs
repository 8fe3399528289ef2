//! Plugin system for credential-validated tool providers
//!
//! A host registers [`ToolProvider`]s with a [`PluginManager`]. Each provider:
//! - validates the credentials an operator configures for it
//! - exposes one or more [`Tool`]s that the host invokes with a parameter map
//!
//! Tools never fail past their own boundary: every outcome, including errors,
//! is reported as a sequence of [`ToolMessage`]s.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use crate::message::{ParameterMap, ToolMessage};

/// Boxed future returned by plugin trait methods
pub type PluginFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Errors that can occur during plugin operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PluginError {
    #[error("{0}")]
    CredentialValidation(String),

    #[error("Provider '{0}' is not registered")]
    ProviderNotFound(String),

    #[error("Tool '{tool_name}' is not provided by '{provider_name}'")]
    ToolNotFound {
        provider_name: String,
        tool_name: String,
    },

    #[error("Provider '{0}' is already registered")]
    DuplicateProvider(String),
}

/// Runtime state the host attaches to every tool invocation
#[derive(Clone, Default)]
pub struct ToolRuntime {
    /// Credentials configured for the provider that owns the tool
    pub credentials: ParameterMap,
}

impl ToolRuntime {
    pub fn new(credentials: ParameterMap) -> Self {
        Self { credentials }
    }
}

impl std::fmt::Debug for ToolRuntime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let keys: Vec<&String> = self.credentials.keys().collect();
        f.debug_struct("ToolRuntime")
            .field("credentials", &keys)
            .finish()
    }
}

/// A single invocable operation exposed by a provider
pub trait Tool: Send + Sync {
    /// Identifier the host uses to invoke this tool
    fn name(&self) -> &'static str;

    /// Run the tool. Failures are reported as messages, never returned.
    fn invoke<'a>(
        &'a self,
        runtime: &'a ToolRuntime,
        params: &'a ParameterMap,
    ) -> PluginFuture<'a, Vec<ToolMessage>>;
}

/// Core provider trait that defines the plugin interface
pub trait ToolProvider: Send + Sync {
    /// Unique identifier for this provider
    fn name(&self) -> &'static str;

    /// Check the credentials an operator configured for this provider.
    ///
    /// Returning an error halts provider setup in the host.
    fn validate_credentials<'a>(
        &'a self,
        credentials: &'a ParameterMap,
    ) -> PluginFuture<'a, Result<(), PluginError>>;

    /// Tools this provider exposes
    fn tools(&self) -> Vec<Arc<dyn Tool>>;
}

/// Registry and router for tool providers
#[derive(Default)]
pub struct PluginManager {
    providers: HashMap<&'static str, Arc<dyn ToolProvider>>,
}

impl PluginManager {
    /// Create a new plugin manager
    pub fn new() -> Self {
        Self {
            providers: HashMap::new(),
        }
    }

    /// Register a provider under its own name
    pub fn register_provider(&mut self, provider: Arc<dyn ToolProvider>) -> Result<(), PluginError> {
        let name = provider.name();
        if self.providers.contains_key(name) {
            return Err(PluginError::DuplicateProvider(name.to_string()));
        }

        debug!("Registering provider: {}", name);
        self.providers.insert(name, provider);
        Ok(())
    }

    /// Names of all registered providers
    pub fn provider_names(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.providers.keys().copied().collect();
        names.sort_unstable();
        names
    }

    fn provider(&self, provider_name: &str) -> Result<&Arc<dyn ToolProvider>, PluginError> {
        self.providers
            .get(provider_name)
            .ok_or_else(|| PluginError::ProviderNotFound(provider_name.to_string()))
    }

    /// Validate credentials for the named provider
    pub async fn validate_credentials(
        &self,
        provider_name: &str,
        credentials: &ParameterMap,
    ) -> Result<(), PluginError> {
        let provider = self.provider(provider_name)?;
        debug!("Validating credentials for provider: {}", provider_name);
        provider.validate_credentials(credentials).await
    }

    /// Invoke a tool of the named provider
    pub async fn invoke_tool(
        &self,
        provider_name: &str,
        tool_name: &str,
        runtime: &ToolRuntime,
        params: &ParameterMap,
    ) -> Result<Vec<ToolMessage>, PluginError> {
        let provider = self.provider(provider_name)?;
        let tool = provider
            .tools()
            .into_iter()
            .find(|tool| tool.name() == tool_name)
            .ok_or_else(|| PluginError::ToolNotFound {
                provider_name: provider_name.to_string(),
                tool_name: tool_name.to_string(),
            })?;

        debug!("Invoking tool {}/{}", provider_name, tool_name);
        Ok(tool.invoke(runtime, params).await)
    }
}

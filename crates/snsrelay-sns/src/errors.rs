//! Error types for the SNS plugin

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SnsError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("{0} format is invalid (too short)")]
    MalformedCredential(&'static str),

    #[error("Invalid AWS credentials: {code} - {reason}")]
    AuthenticationFailure { code: String, reason: String },

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("SNS topic not found: {0}")]
    ResourceNotFound(String),

    #[error("AWS error: {code} - {message}")]
    RemoteServiceError { code: String, message: String },

    #[error("Unexpected error: {0}")]
    UnexpectedError(String),
}

impl SnsError {
    /// Error code reported by the remote service, if any
    pub fn remote_code(&self) -> Option<&str> {
        match self {
            SnsError::AuthenticationFailure { code, .. }
            | SnsError::RemoteServiceError { code, .. } => Some(code),
            _ => None,
        }
    }

    /// Whether the remote service itself answered (as opposed to a transport failure)
    pub fn is_service_reported(&self) -> bool {
        matches!(
            self,
            SnsError::AuthenticationFailure { .. }
                | SnsError::RemoteServiceError { .. }
                | SnsError::ResourceNotFound(_)
        )
    }

    /// Build a remote service error from a code and message
    pub fn remote(code: impl Into<String>, message: impl Into<String>) -> Self {
        SnsError::RemoteServiceError {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// Classify an STS error code as an authentication failure with a user-facing reason
pub fn authentication_reason(code: &str) -> Option<&'static str> {
    match code {
        "InvalidClientTokenId" | "UnrecognizedClientException" => {
            Some("The AWS Access Key ID does not exist or is not valid")
        }
        "SignatureDoesNotMatch" | "IncompleteSignature" => {
            Some("The AWS Secret Access Key does not match the Access Key ID")
        }
        "ExpiredToken" | "ExpiredTokenException" | "InvalidToken" => {
            Some("The AWS security token has expired or is invalid")
        }
        "RequestExpired" | "RequestTimeTooSkewed" => {
            Some("The request signature has expired; check that the system clock is correct")
        }
        "AuthFailure" | "AccessDenied" => Some("AWS rejected the supplied credentials"),
        _ => None,
    }
}

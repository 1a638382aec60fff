//! Unified error handling for the gateway
//!
//! Startup failures are [`AppError`]s and abort the process. Everything that
//! happens on behalf of a single request ends up as a [`GatewayError`], which
//! is what GraphQL clients see.

pub mod translate;

use crate::backend::ServiceName;
use async_graphql::ErrorExtensions;
use serde::Serialize;
use thiserror::Error;

pub use translate::{classify, translate};

/// Application-wide result type
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Failed to connect to {service} service at {address}: {source}")]
    Connection {
        service: ServiceName,
        address: String,
        #[source]
        source: tonic::transport::Error,
    },

    #[error("Backend error: {0}")]
    Backend(#[from] tonic::Status),

    #[error("Verification failed: {0}")]
    VerificationFailed(String),

    #[error("Unimplemented: {0}")]
    Unimplemented(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Configuration(err.to_string())
    }
}

/// Fixed set of error classes exposed through the unified API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorClass {
    NotFound,
    InvalidArgument,
    Unauthenticated,
    Internal,
    Unknown,
    VerificationFailed,
    Unimplemented,
}

impl ErrorClass {
    /// Value of the `code` extension on GraphQL errors
    pub fn as_code(&self) -> &'static str {
        match self {
            ErrorClass::NotFound => "NOT_FOUND",
            ErrorClass::InvalidArgument => "INVALID_ARGUMENT",
            ErrorClass::Unauthenticated => "UNAUTHENTICATED",
            ErrorClass::Internal => "INTERNAL",
            ErrorClass::Unknown => "UNKNOWN",
            ErrorClass::VerificationFailed => "VERIFICATION_FAILED",
            ErrorClass::Unimplemented => "UNIMPLEMENTED",
        }
    }
}

/// Error surfaced to unified API callers
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("{message}")]
pub struct GatewayError {
    pub message: String,
    pub classification: ErrorClass,
}

impl GatewayError {
    pub fn new(classification: ErrorClass, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            classification,
        }
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(ErrorClass::InvalidArgument, message)
    }

    pub fn verification_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorClass::VerificationFailed, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorClass::Internal, message)
    }
}

impl From<AppError> for GatewayError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::Backend(status) => translate(&status),
            AppError::VerificationFailed(msg) => GatewayError::verification_failed(msg),
            AppError::Unimplemented(msg) => GatewayError::new(ErrorClass::Unimplemented, msg),
            other => {
                tracing::error!("Internal error: {}", other);
                GatewayError::internal("An internal error occurred")
            }
        }
    }
}

impl ErrorExtensions for GatewayError {
    fn extend(&self) -> async_graphql::Error {
        let code = self.classification.as_code();
        async_graphql::Error::new(self.message.clone()).extend_with(|_, e| e.set("code", code))
    }
}

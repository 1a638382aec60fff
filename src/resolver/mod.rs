//! Operation resolvers
//!
//! A resolver maps one unified API operation onto backend calls. The result
//! is an [`Outcome`]: response data is always present (zero-valued when the
//! operation failed) and the error channel carries the failure, if any.

pub mod auth;

use crate::error::GatewayError;

pub use auth::AuthResolver;

/// Result of one operation: data plus an optional error
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome<T> {
    pub data: T,
    pub error: Option<GatewayError>,
}

impl<T> Outcome<T> {
    pub fn success(data: T) -> Self {
        Self { data, error: None }
    }

    /// Data that is returned together with an error
    pub fn partial(data: T, error: GatewayError) -> Self {
        Self {
            data,
            error: Some(error),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    pub fn into_result(self) -> Result<T, GatewayError> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(self.data),
        }
    }
}

impl<T: Default> Outcome<T> {
    pub fn failure(error: GatewayError) -> Self {
        Self::partial(T::default(), error)
    }
}

impl<T: Default> From<Result<T, GatewayError>> for Outcome<T> {
    fn from(result: Result<T, GatewayError>) -> Self {
        match result {
            Ok(data) => Outcome::success(data),
            Err(error) => Outcome::failure(error),
        }
    }
}

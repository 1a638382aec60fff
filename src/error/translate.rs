//! Backend failure translation
//!
//! gRPC status codes are mapped through a fixed table; the backend's message
//! is carried over verbatim so callers keep the diagnostic text.

use super::{ErrorClass, GatewayError};
use tonic::{Code, Status};

/// Map a gRPC status code to its unified API error class
pub fn classify(code: Code) -> ErrorClass {
    match code {
        Code::NotFound => ErrorClass::NotFound,
        Code::InvalidArgument
        | Code::AlreadyExists
        | Code::FailedPrecondition
        | Code::OutOfRange => ErrorClass::InvalidArgument,
        Code::Unauthenticated | Code::PermissionDenied => ErrorClass::Unauthenticated,
        Code::Internal
        | Code::Unavailable
        | Code::DataLoss
        | Code::DeadlineExceeded
        | Code::Cancelled
        | Code::ResourceExhausted
        | Code::Aborted => ErrorClass::Internal,
        Code::Unimplemented => ErrorClass::Unimplemented,
        Code::Ok | Code::Unknown => ErrorClass::Unknown,
    }
}

/// Translate a backend failure into a [`GatewayError`]
pub fn translate(status: &Status) -> GatewayError {
    let classification = classify(status.code());
    let message = if status.message().is_empty() {
        status.code().description().to_string()
    } else {
        status.message().to_string()
    };

    GatewayError {
        message,
        classification,
    }
}

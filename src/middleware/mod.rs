//! HTTP middleware
//!
//! - Request ID propagation and HTTP metrics
//! - Request spans with GraphQL variables redacted

pub mod observability;
pub mod trace;

pub use observability::ObservabilityLayer;
pub use trace::SanitizedMakeSpan;

//! Durudex Gateway
//!
//! A single GraphQL API in front of the Durudex gRPC services. Operations run
//! their directive chain, then call the backend over a pooled channel;
//! backend failures are translated into GraphQL errors.

pub mod api;
pub mod backend;
pub mod config;
pub mod context;
pub mod directive;
pub mod error;
pub mod gateway;
pub mod graphql;
pub mod grpc;
pub mod middleware;
pub mod model;
pub mod operation;
pub mod resolver;
pub mod server;
pub mod telemetry;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, GatewayError, Result};
pub use gateway::Gateway;

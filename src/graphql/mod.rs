//! GraphQL surface of the unified API

pub mod mutation;
pub mod query;
pub mod schema;

pub use schema::{build_schema, GatewaySchema};

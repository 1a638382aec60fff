//! gRPC wire types and client stubs for the backend services
//!
//! The files under `proto/` are generated from the Durudex service
//! definitions and checked in, so building the gateway does not need `protoc`.

use chrono::{DateTime, Utc};

#[allow(clippy::all)]
pub mod proto {
    pub mod google {
        pub mod protobuf {
            include!("proto/google.protobuf.rs");
        }
    }

    pub mod gateway {
        include!("proto/gateway.rs");
    }
}

pub use proto::gateway::auth_service_client::AuthServiceClient;
pub use proto::gateway::code_service_client::CodeServiceClient;
pub use proto::google::protobuf::Timestamp;

impl From<DateTime<Utc>> for Timestamp {
    fn from(value: DateTime<Utc>) -> Self {
        Self {
            seconds: value.timestamp(),
            nanos: value.timestamp_subsec_nanos() as i32,
        }
    }
}

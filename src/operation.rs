//! Operations of the unified API

use serde::{Deserialize, Serialize};
use std::fmt;

/// Every operation the gateway exposes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Operation {
    SignUp,
    SignIn,
    RefreshTokens,
    Verify,
    GetCode,
}

impl Operation {
    pub const ALL: [Operation; 5] = [
        Operation::SignUp,
        Operation::SignIn,
        Operation::RefreshTokens,
        Operation::Verify,
        Operation::GetCode,
    ];

    /// Field name of the operation in the GraphQL schema
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::SignUp => "signUp",
            Operation::SignIn => "signIn",
            Operation::RefreshTokens => "refreshTokens",
            Operation::Verify => "verify",
            Operation::GetCode => "getCode",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

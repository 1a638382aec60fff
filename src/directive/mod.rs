//! Pre-conditions attached to unified API operations
//!
//! A directive is a named check that runs before an operation's resolver.
//! Operations carry an ordered [`DirectiveChain`]; the chain runs its steps
//! one after another and stops at the first failure, in which case the
//! resolver is never called.

pub mod chain;
pub mod email_code;

use crate::context::RequestContext;
use crate::error::GatewayError;
use crate::operation::Operation;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

pub use chain::{DirectiveChain, DirectiveSet, OperationTable};
pub use email_code::EmailCodeDirective;

/// Signal that a directive passed and execution may proceed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Continue;

/// A named pre-condition
#[async_trait]
pub trait Directive: Send + Sync {
    /// Name used to attach the directive to operations (e.g. `emailCode`)
    fn name(&self) -> &'static str;

    async fn check(
        &self,
        args: &DirectiveArgs,
        ctx: &RequestContext,
    ) -> Result<Continue, GatewayError>;
}

/// Source of one directive argument
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ArgValue {
    /// Read from a field of the operation's input (`{ input = "email" }`)
    Input { input: String },
    /// Fixed value declared with the directive
    Literal(Value),
}

impl ArgValue {
    pub fn literal(value: impl Into<Value>) -> Self {
        ArgValue::Literal(value.into())
    }

    pub fn input(field: impl Into<String>) -> Self {
        ArgValue::Input {
            input: field.into(),
        }
    }

    fn resolve(&self, input: &Value) -> Option<Value> {
        match self {
            ArgValue::Literal(value) => Some(value.clone()),
            ArgValue::Input { input: field } => input.get(field).cloned(),
        }
    }
}

/// Declaration attaching a directive to an operation
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DirectiveSpec {
    pub operation: Operation,
    pub name: String,
    #[serde(default)]
    pub args: BTreeMap<String, ArgValue>,
}

impl DirectiveSpec {
    pub fn new(operation: Operation, name: impl Into<String>) -> Self {
        Self {
            operation,
            name: name.into(),
            args: BTreeMap::new(),
        }
    }

    pub fn arg(mut self, name: impl Into<String>, value: ArgValue) -> Self {
        self.args.insert(name.into(), value);
        self
    }
}

/// Arguments of one directive, resolved against the current request
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DirectiveArgs {
    values: BTreeMap<String, Value>,
}

impl DirectiveArgs {
    pub fn resolve(args: &BTreeMap<String, ArgValue>, input: &Value) -> Self {
        let values = args
            .iter()
            .filter_map(|(name, arg)| arg.resolve(input).map(|value| (name.clone(), value)))
            .collect();
        Self { values }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Required, non-empty string argument
    pub fn string(&self, name: &str) -> Result<&str, GatewayError> {
        match self.values.get(name) {
            Some(Value::String(s)) if !s.is_empty() => Ok(s.as_str()),
            Some(Value::String(_)) => Err(GatewayError::invalid_argument(format!(
                "directive argument '{}' must not be empty",
                name
            ))),
            Some(_) => Err(GatewayError::invalid_argument(format!(
                "directive argument '{}' must be a string",
                name
            ))),
            None => Err(missing(name)),
        }
    }

    /// Required unsigned integer argument
    pub fn unsigned(&self, name: &str) -> Result<u64, GatewayError> {
        match self.values.get(name) {
            Some(value) => value.as_u64().ok_or_else(|| {
                GatewayError::invalid_argument(format!(
                    "directive argument '{}' must be an unsigned integer",
                    name
                ))
            }),
            None => Err(missing(name)),
        }
    }
}

impl<const N: usize> From<[(&str, Value); N]> for DirectiveArgs {
    fn from(values: [(&str, Value); N]) -> Self {
        Self {
            values: values
                .into_iter()
                .map(|(name, value)| (name.to_string(), value))
                .collect(),
        }
    }
}

fn missing(name: &str) -> GatewayError {
    GatewayError::invalid_argument(format!("directive argument '{}' is required", name))
}

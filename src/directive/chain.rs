//! Ordered directive chains per operation

use super::{ArgValue, Continue, Directive, DirectiveArgs, DirectiveSpec};
use crate::context::RequestContext;
use crate::error::{AppError, GatewayError, Result};
use crate::operation::Operation;
use metrics::counter;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::debug;

/// Directives available for attachment, by name
#[derive(Clone, Default)]
pub struct DirectiveSet {
    directives: HashMap<&'static str, Arc<dyn Directive>>,
}

impl DirectiveSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, directive: Arc<dyn Directive>) -> Self {
        self.directives.insert(directive.name(), directive);
        self
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Directive>> {
        self.directives.get(name).cloned()
    }

    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.directives.keys().copied().collect();
        names.sort_unstable();
        names
    }
}

impl std::fmt::Debug for DirectiveSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirectiveSet")
            .field("directives", &self.names())
            .finish()
    }
}

struct Step {
    directive: Arc<dyn Directive>,
    args: BTreeMap<String, ArgValue>,
}

/// Directives attached to a single operation, in declaration order
#[derive(Default)]
pub struct DirectiveChain {
    steps: Vec<Step>,
}

impl DirectiveChain {
    pub fn push(&mut self, directive: Arc<dyn Directive>, args: BTreeMap<String, ArgValue>) {
        self.steps.push(Step { directive, args });
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Run every step in order, stopping at the first failure
    pub async fn run<I: Serialize + ?Sized>(
        &self,
        operation: Operation,
        input: &I,
        ctx: &RequestContext,
    ) -> std::result::Result<Continue, GatewayError> {
        if self.steps.is_empty() {
            return Ok(Continue);
        }

        let input = serde_json::to_value(input).map_err(|e| {
            tracing::error!("Failed to serialize {} input: {}", operation, e);
            GatewayError::internal("An internal error occurred")
        })?;

        for step in &self.steps {
            let name = step.directive.name();
            let args = DirectiveArgs::resolve(&step.args, &input);

            if let Err(err) = step.directive.check(&args, ctx).await {
                debug!(
                    request_id = %ctx.request_id,
                    directive = name,
                    operation = %operation,
                    "Directive rejected request: {}",
                    err.message
                );
                counter!(
                    "gateway_directive_rejections_total",
                    "directive" => name,
                    "operation" => operation.as_str()
                )
                .increment(1);
                return Err(err);
            }
        }

        Ok(Continue)
    }
}

impl std::fmt::Debug for DirectiveChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.steps.iter().map(|step| step.directive.name()))
            .finish()
    }
}

/// Directive chains for every unified API operation
#[derive(Debug, Default)]
pub struct OperationTable {
    chains: HashMap<Operation, DirectiveChain>,
}

impl OperationTable {
    /// Attach directives to operations
    ///
    /// Naming a directive that is not in `available` is a configuration error.
    pub fn build(specs: &[DirectiveSpec], available: &DirectiveSet) -> Result<Self> {
        let mut chains: HashMap<Operation, DirectiveChain> = HashMap::new();

        for spec in specs {
            let directive = available.get(&spec.name).ok_or_else(|| {
                AppError::Configuration(format!(
                    "unknown directive '{}' on operation {} (available: {})",
                    spec.name,
                    spec.operation,
                    available.names().join(", ")
                ))
            })?;
            chains
                .entry(spec.operation)
                .or_default()
                .push(directive, spec.args.clone());
        }

        for (operation, chain) in &chains {
            debug!("Operation {} has directives {:?}", operation, chain);
        }

        Ok(Self { chains })
    }

    pub fn chain(&self, operation: Operation) -> Option<&DirectiveChain> {
        self.chains.get(&operation)
    }

    /// Run the pre-conditions of `operation` against its input
    pub async fn check<I: Serialize + ?Sized>(
        &self,
        operation: Operation,
        input: &I,
        ctx: &RequestContext,
    ) -> std::result::Result<Continue, GatewayError> {
        match self.chains.get(&operation) {
            Some(chain) => chain.run(operation, input, ctx).await,
            None => Ok(Continue),
        }
    }
}

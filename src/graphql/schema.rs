use super::{mutation::MutationRoot, query::QueryRoot};
use crate::gateway::Gateway;
use async_graphql::{EmptySubscription, Schema};
use std::sync::Arc;

pub type GatewaySchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

pub fn build_schema(gateway: Arc<Gateway>) -> GatewaySchema {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .limit_complexity(200)
        .limit_depth(10)
        .data(gateway)
        .finish()
}

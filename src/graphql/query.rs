use async_graphql::Object;

#[derive(Default)]
pub struct QueryRoot;

#[Object]
impl QueryRoot {
    /// Gateway version
    async fn version(&self) -> &'static str {
        env!("CARGO_PKG_VERSION")
    }
}

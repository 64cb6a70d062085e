use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum FetchError {
    #[error("Upstream order lookup failed: {0}")]
    Upstream(String),
    #[error("Could not resolve credentials for {0}")]
    Credentials(String),
}

/// One fully fetched order body. In-memory only; lives for a single processing pass.
#[derive(Debug, Clone)]
pub struct FetchedOrder {
    pub order_id: i64,
    /// The complete upstream order record as a JSON object.
    pub body: Value,
}

/// The upstream order lookup.
///
/// One call covers the full id set of a batch (a single batched upstream request, never per-id). Implementations
/// resolve per-shop credentials on every call and handle upstream rate limiting internally; any error that escapes
/// this trait is fatal for the current batch, and the caller leaves all work items in place.
#[allow(async_fn_in_trait)]
pub trait OrderFetcher {
    /// Ids the upstream no longer knows about are simply absent from the result.
    async fn fetch_orders(&self, shop_url: &str, order_ids: &[i64]) -> Result<Vec<FetchedOrder>, FetchError>;
}

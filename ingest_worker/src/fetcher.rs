use ingest_engine::{
    traits::{FetchError, FetchedOrder, OrderFetcher, SecretStore},
    SqliteDatabase,
};
use log::debug;
use shopify_client::{ShopifyApi, ShopifyConfig};

/// The production [`OrderFetcher`]: resolves the shop's Admin API token from the secrets store and runs one batched
/// order lookup through [`ShopifyApi`]. Credentials are looked up on every call; nothing is cached across shops.
#[derive(Clone)]
pub struct ShopifyFetcher {
    db: SqliteDatabase,
    api_version: String,
}

impl ShopifyFetcher {
    pub fn new(db: SqliteDatabase, api_version: impl Into<String>) -> Self {
        Self { db, api_version: api_version.into() }
    }
}

/// Secrets are keyed by hostname, but shop URLs arrive with their scheme attached.
fn host_of(shop_url: &str) -> &str {
    shop_url.split("://").last().unwrap_or(shop_url)
}

impl OrderFetcher for ShopifyFetcher {
    async fn fetch_orders(&self, shop_url: &str, order_ids: &[i64]) -> Result<Vec<FetchedOrder>, FetchError> {
        let host = host_of(shop_url);
        let token =
            self.db.fetch_secret(host).await.map_err(|e| FetchError::Credentials(format!("{shop_url}: {e}")))?;
        debug!("🔑️ Resolved credentials for {host}");
        let config = ShopifyConfig::new(host, token, &self.api_version);
        let api = ShopifyApi::new(config).map_err(|e| FetchError::Upstream(e.to_string()))?;
        let orders = api.fetch_orders(order_ids).await.map_err(|e| FetchError::Upstream(e.to_string()))?;
        let mut result = Vec::with_capacity(orders.len());
        for order in orders {
            let body = serde_json::to_value(&order).map_err(|e| FetchError::Upstream(e.to_string()))?;
            result.push(FetchedOrder { order_id: order.id, body });
        }
        Ok(result)
    }
}

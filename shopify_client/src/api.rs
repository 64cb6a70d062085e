use std::{future::Future, sync::Arc, time::Duration};

use log::*;
use reqwest::{
    header::{HeaderMap, HeaderValue, RETRY_AFTER},
    Client,
    Method,
    StatusCode,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::{config::ShopifyConfig, ShopifyApiError, ShopifyOrder};

/// Shopify omits the `Retry-After` header on occasion; 4 seconds is a safe upper bound for the standard API call
/// limit's leak rate.
const DEFAULT_RETRY_AFTER: f64 = 4.0;

#[derive(Clone)]
pub struct ShopifyApi {
    config: ShopifyConfig,
    client: Arc<Client>,
}

impl ShopifyApi {
    pub fn new(config: ShopifyConfig) -> Result<Self, ShopifyApiError> {
        let mut headers = HeaderMap::with_capacity(2);
        let val = HeaderValue::from_str(config.admin_access_token.reveal().as_str())
            .map_err(|e| ShopifyApiError::Initialization(e.to_string()))?;
        headers.insert("X-Shopify-Access-Token", val);
        headers.insert("Content-Type", HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| ShopifyApiError::Initialization(e.to_string()))?;
        Ok(Self { config, client: Arc::new(client) })
    }

    pub fn url(&self, path: &str) -> String {
        format!("https://{}/admin/api/{}{path}", self.config.shop, self.config.api_version)
    }

    pub async fn rest_query<T: DeserializeOwned, B: Serialize>(
        &self,
        method: Method,
        path: &str,
        params: &[(&str, &str)],
        body: Option<B>,
    ) -> Result<T, ShopifyApiError> {
        let url = self.url(path);
        trace!("Sending REST query: {url}");
        let mut req = self.client.request(method, url);
        if !params.is_empty() {
            req = req.query(params);
        }
        if let Some(body) = body {
            req = req.json(&body);
        }
        let response = req.send().await.map_err(|e| ShopifyApiError::RestResponseError(e.to_string()))?;
        if response.status().is_success() {
            trace!("REST query successful. {}", response.status());
            response.json::<T>().await.map_err(|e| ShopifyApiError::JsonError(e.to_string()))
        } else if response.status() == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = retry_after_seconds(response.headers());
            Err(ShopifyApiError::RateLimited { retry_after })
        } else {
            let status = response.status().as_u16();
            let message = response.text().await.map_err(|e| ShopifyApiError::RestResponseError(e.to_string()))?;
            Err(ShopifyApiError::QueryError { status, message })
        }
    }

    /// Fetches the full order records for the given set of ids in a single batched request.
    ///
    /// Ids that Shopify no longer knows about (deleted or archived orders) are simply absent from the result; the
    /// caller decides what absence means. Rate limiting is handled internally and never surfaces.
    pub async fn fetch_orders(&self, order_ids: &[i64]) -> Result<Vec<ShopifyOrder>, ShopifyApiError> {
        #[derive(Deserialize)]
        struct OrdersResponse {
            orders: Vec<ShopifyOrder>,
        }
        let ids = order_ids.iter().map(|id| id.to_string()).collect::<Vec<String>>().join(",");
        let params = [("ids", ids.as_str()), ("status", "any")];
        debug!("Fetching {} orders from {}", order_ids.len(), self.config.shop);
        let result = with_rate_limit_retry(|| self.rest_query::<OrdersResponse, ()>(Method::GET, "/orders.json", &params, None))
            .await?;
        info!("Fetched {} of {} orders from {}", result.orders.len(), order_ids.len(), self.config.shop);
        Ok(result.orders)
    }
}

/// Runs `attempt` until it returns anything other than [`ShopifyApiError::RateLimited`], sleeping for the
/// server-supplied interval between attempts. There is deliberately no retry cap: the upstream's own backpressure
/// signal is the only throttle.
async fn with_rate_limit_retry<T, F, Fut>(mut attempt: F) -> Result<T, ShopifyApiError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ShopifyApiError>>,
{
    loop {
        match attempt().await {
            Err(ShopifyApiError::RateLimited { retry_after }) => {
                warn!("Service exceeds Shopify API call limit, will retry to send request in {retry_after} seconds");
                tokio::time::sleep(Duration::from_secs_f64(retry_after)).await;
            },
            other => return other,
        }
    }
}

fn retry_after_seconds(headers: &HeaderMap) -> f64 {
    headers
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|secs| *secs >= 0.0)
        .unwrap_or(DEFAULT_RETRY_AFTER)
}

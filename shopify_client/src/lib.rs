//! A minimal Shopify Admin REST client for the order ingest worker.
//!
//! The client covers exactly what ingestion needs: a batched order lookup with credentials resolved per shop, and
//! transparent handling of Shopify's API call limit. A 429 response is never surfaced to callers; the client sleeps
//! for the server-supplied `Retry-After` interval and retries until the request goes through. Every other failure is
//! propagated unchanged, because a half-fetched batch must abort rather than delete work items it never published.
mod api;
mod config;
mod error;
mod shopify_order;

pub use api::ShopifyApi;
pub use config::{ShopifyConfig, DEFAULT_API_VERSION};
pub use error::ShopifyApiError;
pub use shopify_order::ShopifyOrder;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ShopifyApiError {
    #[error("Could not initialize client: {0}")]
    Initialization(String),
    #[error("Invalid REST response: {0}")]
    RestResponseError(String),
    #[error("Could not deserialize JSON: {0}")]
    JsonError(String),
    #[error("Query failed. Error {status}. {message}")]
    QueryError { status: u16, message: String },
    /// Internal to the retry loop. `fetch_orders` consumes this variant and never returns it.
    #[error("API call limit exceeded, retry after {retry_after}s")]
    RateLimited { retry_after: f64 },
}

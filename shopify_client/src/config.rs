use siw_common::Secret;

pub const DEFAULT_API_VERSION: &str = "2024-04";

/// Connection settings for one shop. Credentials are resolved per shop from the secrets store just before each
/// fetch, so instances of this struct are short-lived and never cached across shops.
#[derive(Debug, Clone, Default)]
pub struct ShopifyConfig {
    /// The shop hostname, e.g. "my-shop.myshopify.com". Scheme prefixes have already been stripped.
    pub shop: String,
    pub admin_access_token: Secret<String>,
    pub api_version: String,
}

impl ShopifyConfig {
    pub fn new(shop: impl Into<String>, token: Secret<String>, api_version: impl Into<String>) -> Self {
        Self { shop: shop.into(), admin_access_token: token, api_version: api_version.into() }
    }
}

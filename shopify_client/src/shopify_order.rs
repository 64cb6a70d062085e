use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One order record as returned by the Admin REST API.
///
/// Only the id is modeled as a typed field; everything else rides along in `fields` so that republishing an order
/// downstream preserves attributes this crate has no opinion about.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ShopifyOrder {
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

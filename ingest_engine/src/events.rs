//! Outbound message payloads.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::{db_types::TraceLink, traits::FetchedOrder};

/// The self-addressed message that triggers another processing pass for a shop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContinuationSignal {
    pub shop_url: String,
}

impl ContinuationSignal {
    pub fn new(shop_url: impl Into<String>) -> Self {
        Self { shop_url: shop_url.into() }
    }
}

/// Builds the downstream order-received event: the original order fields flattened at the top level, plus the
/// ingestion envelope (`shopId`, `limit`, `is_full_order`) and the trace linkage for stitching across the async
/// boundary.
pub fn order_received_event(order: &FetchedOrder, shop_url: &str, limit: u32, trace: TraceLink) -> Value {
    let mut event = match &order.body {
        Value::Object(fields) => fields.clone(),
        // the fetcher always hands over objects, but a scalar body is still publishable
        other => {
            let mut fields = Map::new();
            fields.insert("order".to_string(), other.clone());
            fields
        },
    };
    event.insert("shopId".to_string(), json!(shop_url));
    event.insert("limit".to_string(), json!(limit));
    event.insert("is_full_order".to_string(), json!(true));
    event.insert("opentelemetry_tracing".to_string(), json!({ "traceId": trace.trace_id, "spanId": trace.span_id }));
    Value::Object(event)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn order_fields_are_flattened_into_the_event() {
        let order = FetchedOrder {
            order_id: 101,
            body: json!({"id": 101, "email": "alice@customer.example", "total_price": "10.00"}),
        };
        let event = order_received_event(&order, "https://shopA.example", 2, TraceLink { trace_id: 9, span_id: 4 });
        assert_eq!(event["id"], 101);
        assert_eq!(event["email"], "alice@customer.example");
        assert_eq!(event["shopId"], "https://shopA.example");
        assert_eq!(event["limit"], 2);
        assert_eq!(event["is_full_order"], true);
        assert_eq!(event["opentelemetry_tracing"], json!({"traceId": 9, "spanId": 4}));
    }

    #[test]
    fn continuation_signal_schema() {
        let signal = ContinuationSignal::new("https://shopA.example");
        let js = serde_json::to_value(&signal).unwrap();
        assert_eq!(js, json!({"shop_url": "https://shopA.example"}));
    }
}

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use sqlx::FromRow;

/// A durable pending-order reference awaiting ingestion.
///
/// Work items are created by whatever upstream system enqueues orders for a shop, and destroyed exclusively by the
/// controller once the order has been published downstream (or observed to be gone upstream). They are never mutated
/// in place.
#[derive(Debug, Clone, FromRow)]
pub struct WorkItem {
    pub order_id: i64,
    pub shop_url: String,
    /// The raw enqueued record, stored as JSON text. The engine only ever looks at the optional
    /// `opentelemetry_tracing` sub-object; everything else is opaque.
    pub payload: String,
    pub created_at: DateTime<Utc>,
}

impl WorkItem {
    /// Extracts the trace linkage carried in the stored payload, if any. Enqueuers write the ids either as JSON
    /// numbers or as decimal strings, so both spellings are accepted.
    pub fn trace_link(&self) -> Option<TraceLink> {
        let payload: Value = serde_json::from_str(&self.payload).ok()?;
        let tracing = payload.get("opentelemetry_tracing")?;
        let trace_id = int_field(tracing, "traceId")?;
        let span_id = int_field(tracing, "spanId")?;
        Some(TraceLink { trace_id, span_id })
    }
}

fn int_field(obj: &Value, key: &str) -> Option<u64> {
    let value = obj.get(key)?;
    value.as_u64().or_else(|| value.as_str().and_then(|s| s.parse::<u64>().ok()))
}

#[derive(Debug, Clone)]
pub struct NewWorkItem {
    pub order_id: i64,
    pub shop_url: String,
    pub payload: String,
}

impl NewWorkItem {
    pub fn new(order_id: i64, shop_url: impl Into<String>) -> Self {
        Self { order_id, shop_url: shop_url.into(), payload: "{}".to_string() }
    }

    pub fn with_payload(mut self, payload: impl Into<String>) -> Self {
        self.payload = payload.into();
        self
    }
}

/// Distributed-trace linkage metadata. Propagation only; never authoritative state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TraceLink {
    #[serde(rename = "traceId")]
    pub trace_id: u64,
    #[serde(rename = "spanId")]
    pub span_id: u64,
}

impl TraceLink {
    /// A fresh trace for a processing pass that has no upstream linkage to stitch to.
    pub fn new_root() -> Self {
        Self { trace_id: rand::random(), span_id: rand::random() }
    }

    /// A new span within this link's trace.
    pub fn child(&self) -> Self {
        Self { trace_id: self.trace_id, span_id: rand::random() }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn item_with_payload(payload: &str) -> WorkItem {
        WorkItem { order_id: 101, shop_url: "shopA".to_string(), payload: payload.to_string(), created_at: Utc::now() }
    }

    #[test]
    fn trace_link_accepts_string_and_numeric_ids() {
        let item = item_with_payload(r#"{"opentelemetry_tracing": {"traceId": "123", "spanId": 456}}"#);
        assert_eq!(item.trace_link(), Some(TraceLink { trace_id: 123, span_id: 456 }));
    }

    #[test]
    fn trace_link_is_absent_for_plain_payloads() {
        assert_eq!(item_with_payload("{}").trace_link(), None);
        assert_eq!(item_with_payload("not json").trace_link(), None);
        assert_eq!(item_with_payload(r#"{"opentelemetry_tracing": {"traceId": "nope"}}"#).trace_link(), None);
    }

    #[test]
    fn child_spans_stay_in_the_same_trace() {
        let root = TraceLink::new_root();
        let child = root.child();
        assert_eq!(child.trace_id, root.trace_id);
    }
}

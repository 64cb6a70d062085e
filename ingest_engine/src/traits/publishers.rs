use serde_json::Value;
use thiserror::Error;

use crate::events::ContinuationSignal;

#[derive(Debug, Clone, Error)]
#[error("Failed to publish to {topic}: {reason}")]
pub struct PublishError {
    pub topic: String,
    pub reason: String,
}

impl PublishError {
    pub fn new(topic: impl Into<String>, reason: impl Into<String>) -> Self {
        Self { topic: topic.into(), reason: reason.into() }
    }
}

/// Emits one message per successfully fetched order onto the downstream order-received topic.
#[allow(async_fn_in_trait)]
pub trait EventPublisher {
    async fn publish_order(&self, event: Value) -> Result<(), PublishError>;
}

/// Emits the self-addressed signal that causes the control loop to be re-invoked for a shop.
#[allow(async_fn_in_trait)]
pub trait ContinuationPublisher {
    async fn publish_continuation(&self, signal: ContinuationSignal) -> Result<(), PublishError>;
}

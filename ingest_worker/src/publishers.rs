//! Channel-backed topic publishers.
//!
//! In the deployed system these topics are external message infrastructure; here each topic is a bounded tokio
//! channel, with the publisher half implementing the engine's publisher traits and the receiver half handed to
//! whoever plays consumer (the dispatch loop for continuations, a delivery task for order events). A send failure
//! surfaces as a [`PublishError`] because the controller treats publish failures as fatal for the batch.
use ingest_engine::{
    events::ContinuationSignal,
    traits::{ContinuationPublisher, EventPublisher, PublishError},
};
use log::trace;
use serde_json::Value;
use tokio::sync::mpsc;

#[derive(Clone)]
pub struct TopicPublisher<E: Send> {
    topic: String,
    sender: mpsc::Sender<E>,
}

impl<E: Send> TopicPublisher<E> {
    /// Creates a topic with a bounded buffer, returning the publisher half and the consumer half.
    pub fn channel(topic: &str, buffer: usize) -> (Self, mpsc::Receiver<E>) {
        let (sender, receiver) = mpsc::channel(buffer);
        (Self { topic: topic.to_string(), sender }, receiver)
    }

    pub fn topic(&self) -> &str {
        self.topic.as_str()
    }

    pub async fn send(&self, event: E) -> Result<(), PublishError> {
        trace!("📨️ Publishing message to {}", self.topic);
        self.sender.send(event).await.map_err(|e| PublishError::new(self.topic.as_str(), e.to_string()))
    }
}

impl EventPublisher for TopicPublisher<Value> {
    async fn publish_order(&self, event: Value) -> Result<(), PublishError> {
        self.send(event).await
    }
}

impl ContinuationPublisher for TopicPublisher<ContinuationSignal> {
    async fn publish_continuation(&self, signal: ContinuationSignal) -> Result<(), PublishError> {
        self.send(signal).await
    }
}

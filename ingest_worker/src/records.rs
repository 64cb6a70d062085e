//! Inbound trigger records.
//!
//! A trigger batch arrives as a JSON array of records, each wrapping exactly one shop URL in one of two shapes: a
//! notification envelope whose `Message` is itself a JSON string, or a change-stream envelope carrying the shop URL
//! as a typed key attribute. The two shapes are modeled as explicit variants and resolved to a shop URL here, at the
//! boundary, so nothing downstream ever sees the wrappers.
use ingest_engine::events::ContinuationSignal;
use serde::{Deserialize, Serialize};

use crate::errors::WorkerError;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TriggerRecord {
    Notification {
        #[serde(rename = "Sns")]
        sns: NotificationEnvelope,
    },
    ChangeStream {
        dynamodb: ChangeStreamEnvelope,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationEnvelope {
    /// A JSON string containing at least `{"shop_url": ...}`.
    #[serde(rename = "Message")]
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeStreamEnvelope {
    #[serde(rename = "Keys")]
    pub keys: ChangeStreamKeys,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeStreamKeys {
    pub shop_url: StringAttribute,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StringAttribute {
    #[serde(rename = "S")]
    pub s: String,
}

impl TriggerRecord {
    pub fn shop_url(&self) -> Result<String, WorkerError> {
        match self {
            TriggerRecord::Notification { sns } => {
                let signal: ContinuationSignal = serde_json::from_str(&sns.message)
                    .map_err(|e| WorkerError::InvalidRecord(format!("bad notification message: {e}")))?;
                Ok(signal.shop_url)
            },
            TriggerRecord::ChangeStream { dynamodb } => Ok(dynamodb.keys.shop_url.s.clone()),
        }
    }
}

impl From<ContinuationSignal> for TriggerRecord {
    fn from(signal: ContinuationSignal) -> Self {
        let message = serde_json::json!({ "shop_url": signal.shop_url }).to_string();
        TriggerRecord::Notification { sns: NotificationEnvelope { message } }
    }
}

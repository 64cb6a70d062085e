use ingest_engine::{
    traits::{PublishError, StoreError},
    IngestError,
};
use thiserror::Error;

use crate::config::ConfigError;

#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("Invalid worker configuration. {0}")]
    Configuration(#[from] ConfigError),
    #[error("Could not read trigger record: {0}")]
    InvalidRecord(String),
    #[error("Could not parse records file: {0}")]
    RecordsFile(String),
    #[error("An error occurred in the ingest engine. {0}")]
    Ingest(#[from] IngestError),
    #[error("An error occurred on the storage backend. {0}")]
    Backend(#[from] StoreError),
    #[error("Could not publish message. {0}")]
    Publish(#[from] PublishError),
    #[error("An I/O error happened in the worker. {0}")]
    IOError(#[from] std::io::Error),
}

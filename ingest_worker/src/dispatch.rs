//! The entry-point dispatch: one trigger batch in, one `handle_shop` call per record.
//!
//! The dispatcher also plays the external scheduler for continuation signals: `run_to_completion` drains the
//! continuation topic one signal at a time, wrapping each signal back into a trigger record exactly as the real
//! transport would. There is deliberately no in-process recursion anywhere in this path; every pass is a fresh
//! invocation.
use ingest_engine::{
    events::ContinuationSignal,
    traits::{ContinuationPublisher, EventPublisher, MarkerStore, OrderFetcher, WorkItemStore},
    IngestController,
};
use log::*;
use tokio::sync::mpsc::{self, error::TryRecvError};

use crate::{errors::WorkerError, records::TriggerRecord};

pub struct ShopDispatcher<Db, F, E, C> {
    controller: IngestController<Db, F, E, C>,
    batch_size: u32,
}

impl<Db, F, E, C> ShopDispatcher<Db, F, E, C>
where
    Db: WorkItemStore + MarkerStore,
    F: OrderFetcher,
    E: EventPublisher,
    C: ContinuationPublisher,
{
    pub fn new(controller: IngestController<Db, F, E, C>, batch_size: u32) -> Self {
        Self { controller, batch_size }
    }

    /// Handles one inbound trigger batch: records are processed sequentially, and the first unhandled failure fails
    /// the whole invocation. There is no partial-success return; redelivery of the batch is the trigger transport's
    /// responsibility.
    pub async fn handle_records(&self, records: &[TriggerRecord]) -> Result<(), WorkerError> {
        for record in records {
            debug!("🚚️ Record received: {record:?}");
            let shop_url = record.shop_url()?;
            info!("🚚️ Start processing for shop {shop_url}, batch size {}", self.batch_size);
            self.controller.handle_shop(&shop_url, self.batch_size).await?;
        }
        info!("🚚️ Successfully finished invocation");
        Ok(())
    }

    /// Drains the continuation topic until it is empty, treating each signal as one fresh invocation. Because
    /// invocations run sequentially and only `handle_shop` enqueues new signals, an empty topic means all shops have
    /// drained.
    pub async fn run_to_completion(
        &self,
        continuations: &mut mpsc::Receiver<ContinuationSignal>,
    ) -> Result<(), WorkerError> {
        loop {
            match continuations.try_recv() {
                Ok(signal) => {
                    let record = TriggerRecord::from(signal);
                    self.handle_records(std::slice::from_ref(&record)).await?;
                },
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => {
                    info!("🚚️ Continuation topic drained; worker going idle");
                    return Ok(());
                },
            }
        }
    }
}

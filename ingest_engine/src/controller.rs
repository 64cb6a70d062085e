//! The batch continuation controller.
//!
//! One invocation of [`IngestController::handle_shop`] performs exactly one bounded processing pass for one shop and
//! then decides what happens next: clear the shop's processing marker because the queue drained, or emit a
//! continuation signal so the external scheduler re-invokes the worker. The controller never loops over batches
//! in-process; bounding each invocation is what keeps it safe under a host-imposed execution deadline.

use std::collections::HashMap;

use log::*;
use thiserror::Error;

use crate::{
    db_types::TraceLink,
    events::{order_received_event, ContinuationSignal},
    traits::{
        ContinuationPublisher,
        EventPublisher,
        FetchError,
        MarkerStore,
        OrderFetcher,
        PublishError,
        StoreError,
        WorkItemStore,
    },
};

#[derive(Debug, Clone, Error)]
pub enum IngestError {
    #[error("Work item store error: {0}")]
    Store(#[from] StoreError),
    #[error("Upstream fetch error: {0}")]
    Fetch(#[from] FetchError),
    #[error("Publish error: {0}")]
    Publish(#[from] PublishError),
}

/// What `handle_shop` decided after its processing pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShopOutcome {
    /// The queue drained; the processing marker was cleared.
    Drained,
    /// Work remains; a continuation signal was emitted and the marker left in place.
    Continued,
}

pub struct IngestController<Db, F, E, C> {
    db: Db,
    fetcher: F,
    events: E,
    continuations: C,
}

impl<Db, F, E, C> IngestController<Db, F, E, C>
where
    Db: WorkItemStore + MarkerStore,
    F: OrderFetcher,
    E: EventPublisher,
    C: ContinuationPublisher,
{
    pub fn new(db: Db, fetcher: F, events: E, continuations: C) -> Self {
        Self { db, fetcher, events, continuations }
    }

    /// Processes one bounded batch for the shop. Returns `true` iff any work items were found.
    ///
    /// The whole queried batch is deleted after the publish loop, including references whose orders no longer exist
    /// upstream: one observation is enough to retire a stale reference, and keeping it would wedge the queue. Any
    /// error before the delete leaves every item in place for a future attempt, so a failed pass never loses work.
    pub async fn process_batch(&self, shop_url: &str, limit: u32) -> Result<bool, IngestError> {
        let batch = self.db.fetch_work_items(shop_url, limit).await?;
        if batch.is_empty() {
            debug!("🛒️ No pending orders for {shop_url}");
            return Ok(false);
        }
        let ids = batch.iter().map(|item| item.order_id).collect::<Vec<i64>>();
        info!("🛒️ Ingesting order ids for {shop_url}: {ids:?}");
        let orders = self
            .fetcher
            .fetch_orders(shop_url, &ids)
            .await?
            .into_iter()
            .map(|order| (order.order_id, order))
            .collect::<HashMap<_, _>>();
        let pass_trace = TraceLink::new_root();
        let mut ingested = Vec::with_capacity(batch.len());
        for item in &batch {
            let trace = match item.trace_link() {
                Some(upstream) => {
                    debug!(
                        "🔗️ Found trace context for order {}. Connecting to upstream trace {}.",
                        item.order_id, upstream.trace_id
                    );
                    upstream.child()
                },
                None => pass_trace.child(),
            };
            match orders.get(&item.order_id) {
                Some(order) => {
                    let event = order_received_event(order, shop_url, limit, trace);
                    self.events.publish_order(event).await?;
                    ingested.push(item.order_id);
                },
                None => {
                    warn!(
                        "🛒️ Order {} not found upstream for {shop_url}, please check if it's archived. Retiring the \
                         reference.",
                        item.order_id
                    );
                },
            }
        }
        info!("🛒️ Published {} of {} orders for {shop_url}", ingested.len(), batch.len());
        let deleted = self.db.delete_work_items(&ids).await?;
        debug!("🛒️ Deleted {deleted} work items for {shop_url}");
        Ok(true)
    }

    /// One per-shop invocation of the control loop: process a batch, then either clear the processing marker (queue
    /// drained) or emit a continuation signal (work remains) and return without looping.
    ///
    /// Clearing the marker and detecting emptiness are not atomic with respect to concurrent enqueues, so after the
    /// marker clear the queue is drained once more. That trades a small chance of duplicate processing for
    /// guaranteed eventual completion without unbounded in-process recursion.
    pub async fn handle_shop(&self, shop_url: &str, batch_size: u32) -> Result<ShopOutcome, IngestError> {
        let progressed = self.process_batch(shop_url, batch_size).await?;
        let drained = !progressed || self.db.fetch_work_items(shop_url, 1).await?.is_empty();
        if drained {
            info!("🛑️ Stop processing for shop {shop_url}");
            self.db.clear_marker(shop_url).await?;
            self.process_batch(shop_url, batch_size).await?;
            debug!("🛑️ Cleared processing marker for shop {shop_url}");
            Ok(ShopOutcome::Drained)
        } else {
            info!("🔁️ Continue recursive processing for shop {shop_url}");
            self.continuations.publish_continuation(ContinuationSignal::new(shop_url)).await?;
            Ok(ShopOutcome::Continued)
        }
    }
}

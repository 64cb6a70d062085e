//! Interface contracts between the controller and its collaborators.
//!
//! The controller is written against these traits rather than concrete types:
//! * [`WorkItemStore`] and [`MarkerStore`] are the durable state; [`SqliteDatabase`](crate::SqliteDatabase)
//!   implements both.
//! * [`SecretStore`] resolves per-shop API credentials for whatever implements [`OrderFetcher`].
//! * [`OrderFetcher`] is the upstream order lookup. The production implementation wraps the Shopify client; tests
//!   substitute mocks.
//! * [`EventPublisher`] and [`ContinuationPublisher`] are the outbound message transports.
mod fetcher;
mod publishers;
mod stores;

pub use fetcher::{FetchError, FetchedOrder, OrderFetcher};
pub use publishers::{ContinuationPublisher, EventPublisher, PublishError};
pub use stores::{MarkerStore, SecretStore, StoreError, WorkItemStore, EMPTY_SECRET_KEY};

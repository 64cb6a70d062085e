//! Order Ingest Engine
//!
//! The engine owns the durable state and the control loop of the ingest worker. It is divided into two main
//! sections:
//! 1. Durable storage ([`mod@sqlite`]): the work-item queue, the per-shop processing markers and the per-shop API
//!    secrets, backed by SQLite. You should never need to touch the tables directly; the [`SqliteDatabase`] type
//!    implements the storage traits the controller consumes.
//! 2. The batch continuation controller ([`mod@controller`]): one processing pass for one shop. It pulls a bounded
//!    batch of pending order references, fetches the full order bodies upstream, republishes them downstream, retires
//!    the references, and then decides whether to clear the shop's processing marker or emit a continuation signal so
//!    the external scheduler re-invokes it.
//!
//! Fetching and publishing are behind the trait seams in [`mod@traits`], so the controller itself never knows whether
//! orders come from Shopify or a mock, nor where events end up. The worker binary wires up the concrete
//! collaborators.
pub mod controller;
pub mod db_types;
pub mod events;
pub mod sqlite;
pub mod test_utils;
pub mod traits;

pub use controller::{IngestController, IngestError, ShopOutcome};
pub use sqlite::SqliteDatabase;

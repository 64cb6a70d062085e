use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use ingest_engine::{
    db_types::NewWorkItem,
    events::ContinuationSignal,
    test_utils::{prepare_test_env, random_db_path},
    traits::{
        ContinuationPublisher,
        EventPublisher,
        FetchError,
        FetchedOrder,
        MarkerStore,
        OrderFetcher,
        PublishError,
        WorkItemStore,
    },
    IngestController,
    ShopOutcome,
    SqliteDatabase,
};
use mockall::mock;
use serde_json::{json, Value};

mock! {
    pub Fetcher {}
    impl OrderFetcher for Fetcher {
        async fn fetch_orders(&self, shop_url: &str, order_ids: &[i64]) -> Result<Vec<FetchedOrder>, FetchError>;
    }
}

mock! {
    pub OrderTopic {}
    impl EventPublisher for OrderTopic {
        async fn publish_order(&self, event: Value) -> Result<(), PublishError>;
    }
}

mock! {
    pub ContinuationTopic {}
    impl ContinuationPublisher for ContinuationTopic {
        async fn publish_continuation(&self, signal: ContinuationSignal) -> Result<(), PublishError>;
    }
}

const SHOP_A: &str = "https://shopA.example";
const SHOP_B: &str = "https://shopB.example";

async fn new_db() -> SqliteDatabase {
    let url = random_db_path();
    prepare_test_env(&url).await
}

fn order_body(id: i64) -> FetchedOrder {
    FetchedOrder { order_id: id, body: json!({"id": id, "total_price": "10.00"}) }
}

/// A fetcher that returns full orders for every requested id that is in `known`.
fn fetcher_with_orders(known: &'static [i64]) -> MockFetcher {
    let mut fetcher = MockFetcher::new();
    fetcher.expect_fetch_orders().returning(move |_, ids| {
        Ok(ids.iter().filter(|id| known.contains(id)).map(|id| order_body(*id)).collect())
    });
    fetcher
}

#[tokio::test]
async fn batch_with_a_missing_upstream_order_is_retired_in_full() {
    let db = new_db().await;
    for id in [101, 102, 103] {
        db.insert_work_item(NewWorkItem::new(id, SHOP_A)).await.unwrap();
    }
    db.mark_processing(SHOP_A).await.unwrap();
    // 102 is gone upstream (archived); only 101 and 103 resolve
    let fetcher = fetcher_with_orders(&[101, 103]);
    let published = Arc::new(AtomicUsize::new(0));
    let mut events = MockOrderTopic::new();
    let count = Arc::clone(&published);
    events.expect_publish_order().returning(move |event| {
        assert_eq!(event["shopId"], SHOP_A);
        assert_eq!(event["limit"], 2);
        assert_eq!(event["is_full_order"], true);
        assert!(event["opentelemetry_tracing"]["traceId"].is_u64());
        count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    });
    let continuations = MockContinuationTopic::new();
    let controller = IngestController::new(db.clone(), fetcher, events, continuations);

    // first batch covers {101, 102}: one publish, one not-found diagnostic, both deleted
    assert!(controller.process_batch(SHOP_A, 2).await.unwrap());
    assert_eq!(published.load(Ordering::SeqCst), 1);
    let remaining = db.fetch_work_items(SHOP_A, 10).await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].order_id, 103);

    // second batch covers {103}
    assert!(controller.process_batch(SHOP_A, 2).await.unwrap());
    assert_eq!(published.load(Ordering::SeqCst), 2);
    assert!(db.fetch_work_items(SHOP_A, 10).await.unwrap().is_empty());
}

#[tokio::test]
async fn process_batch_on_an_empty_shop_is_a_no_op() {
    let db = new_db().await;
    let mut fetcher = MockFetcher::new();
    fetcher.expect_fetch_orders().never();
    let mut events = MockOrderTopic::new();
    events.expect_publish_order().never();
    let controller = IngestController::new(db.clone(), fetcher, events, MockContinuationTopic::new());
    assert!(!controller.process_batch(SHOP_B, 5).await.unwrap());
}

#[tokio::test]
async fn deletes_exactly_k_items_for_k_up_to_batch_size() {
    for k in 0..=3u32 {
        let db = new_db().await;
        for id in 0..k {
            db.insert_work_item(NewWorkItem::new(i64::from(id) + 1, SHOP_A)).await.unwrap();
        }
        let fetcher = fetcher_with_orders(&[1, 2, 3]);
        let mut events = MockOrderTopic::new();
        events.expect_publish_order().times(k as usize).returning(|_| Ok(()));
        let controller = IngestController::new(db.clone(), fetcher, events, MockContinuationTopic::new());
        let progressed = controller.process_batch(SHOP_A, 3).await.unwrap();
        assert_eq!(progressed, k > 0);
        assert!(db.fetch_work_items(SHOP_A, 10).await.unwrap().is_empty());
    }
}

#[tokio::test]
async fn draining_the_shop_clears_the_marker_and_double_drains() {
    let db = new_db().await;
    db.insert_work_item(NewWorkItem::new(101, SHOP_A)).await.unwrap();
    db.insert_work_item(NewWorkItem::new(102, SHOP_A)).await.unwrap();
    db.mark_processing(SHOP_A).await.unwrap();
    let fetcher = fetcher_with_orders(&[101, 102]);
    let mut events = MockOrderTopic::new();
    events.expect_publish_order().times(2).returning(|_| Ok(()));
    let mut continuations = MockContinuationTopic::new();
    continuations.expect_publish_continuation().never();
    let controller = IngestController::new(db.clone(), fetcher, events, continuations);

    let outcome = controller.handle_shop(SHOP_A, 5).await.unwrap();
    assert_eq!(outcome, ShopOutcome::Drained);
    assert!(!db.is_processing(SHOP_A).await.unwrap());
    assert!(db.fetch_work_items(SHOP_A, 1).await.unwrap().is_empty());
}

#[tokio::test]
async fn remaining_work_emits_a_continuation_signal_and_keeps_the_marker() {
    let db = new_db().await;
    for id in 1..=4 {
        db.insert_work_item(NewWorkItem::new(id, SHOP_A)).await.unwrap();
    }
    db.mark_processing(SHOP_A).await.unwrap();
    let fetcher = fetcher_with_orders(&[1, 2, 3, 4]);
    let mut events = MockOrderTopic::new();
    events.expect_publish_order().times(2).returning(|_| Ok(()));
    let mut continuations = MockContinuationTopic::new();
    continuations
        .expect_publish_continuation()
        .times(1)
        .withf(|signal| signal.shop_url == SHOP_A)
        .returning(|_| Ok(()));
    let controller = IngestController::new(db.clone(), fetcher, events, continuations);

    let outcome = controller.handle_shop(SHOP_A, 2).await.unwrap();
    assert_eq!(outcome, ShopOutcome::Continued);
    assert!(db.is_processing(SHOP_A).await.unwrap());
    assert_eq!(db.fetch_work_items(SHOP_A, 10).await.unwrap().len(), 2);
}

#[tokio::test]
async fn an_already_empty_shop_still_gets_its_marker_cleared() {
    let db = new_db().await;
    db.mark_processing(SHOP_B).await.unwrap();
    let mut fetcher = MockFetcher::new();
    fetcher.expect_fetch_orders().never();
    let mut events = MockOrderTopic::new();
    events.expect_publish_order().never();
    let mut continuations = MockContinuationTopic::new();
    continuations.expect_publish_continuation().never();
    let controller = IngestController::new(db.clone(), fetcher, events, continuations);

    let outcome = controller.handle_shop(SHOP_B, 5).await.unwrap();
    assert_eq!(outcome, ShopOutcome::Drained);
    assert!(!db.is_processing(SHOP_B).await.unwrap());
}

#[tokio::test]
async fn upstream_failure_aborts_the_batch_without_deleting_anything() {
    let db = new_db().await;
    db.insert_work_item(NewWorkItem::new(101, SHOP_A)).await.unwrap();
    let mut fetcher = MockFetcher::new();
    fetcher
        .expect_fetch_orders()
        .returning(|_, _| Err(FetchError::Upstream("Error 401. bad token".to_string())));
    let mut events = MockOrderTopic::new();
    events.expect_publish_order().never();
    let controller = IngestController::new(db.clone(), fetcher, events, MockContinuationTopic::new());

    assert!(controller.process_batch(SHOP_A, 5).await.is_err());
    assert_eq!(db.fetch_work_items(SHOP_A, 10).await.unwrap().len(), 1);
}

#[tokio::test]
async fn publish_failure_aborts_the_batch_before_any_delete() {
    let db = new_db().await;
    db.insert_work_item(NewWorkItem::new(101, SHOP_A)).await.unwrap();
    db.insert_work_item(NewWorkItem::new(102, SHOP_A)).await.unwrap();
    let fetcher = fetcher_with_orders(&[101, 102]);
    let mut events = MockOrderTopic::new();
    events.expect_publish_order().returning(|_| Err(PublishError::new("order-received", "topic gone")));
    let controller = IngestController::new(db.clone(), fetcher, events, MockContinuationTopic::new());

    assert!(controller.process_batch(SHOP_A, 5).await.is_err());
    assert_eq!(db.fetch_work_items(SHOP_A, 10).await.unwrap().len(), 2);
}

#[tokio::test]
async fn stored_trace_context_is_stitched_into_the_published_event() {
    let db = new_db().await;
    let payload = r#"{"opentelemetry_tracing": {"traceId": "987", "spanId": "654"}}"#;
    db.insert_work_item(NewWorkItem::new(101, SHOP_A).with_payload(payload)).await.unwrap();
    let fetcher = fetcher_with_orders(&[101]);
    let mut events = MockOrderTopic::new();
    events.expect_publish_order().times(1).returning(|event| {
        // the published span continues the enqueuer's trace, with a fresh span id
        assert_eq!(event["opentelemetry_tracing"]["traceId"], 987);
        assert_ne!(event["opentelemetry_tracing"]["spanId"], 654);
        Ok(())
    });
    let controller = IngestController::new(db.clone(), fetcher, events, MockContinuationTopic::new());
    assert!(controller.process_batch(SHOP_A, 1).await.unwrap());
}

//! Integration tests for the check-in pipeline against live Redis.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use redis::AsyncCommands;
use tokio::sync::watch;
use uuid::Uuid;

use venuepulse_core::config::pipeline::PipelineConfig;
use venuepulse_core::types::id::SpaceId;
use venuepulse_counter::keys;
use venuepulse_entity::checkin::{CheckInAction, CheckInEvent};
use venuepulse_pipeline::consumer::CheckInWorker;
use venuepulse_pipeline::producer::CheckInProducer;
use venuepulse_service::notification::AlertNotifier;

use crate::helpers::TestApp;

/// Notifier that records every alert for later assertions.
#[derive(Debug, Default)]
struct RecordingNotifier {
    alerts: Mutex<Vec<(i64, i64)>>,
}

#[async_trait]
impl AlertNotifier for RecordingNotifier {
    async fn notify_capacity_alert(
        &self,
        space_id: SpaceId,
        current_count: i64,
        _max_capacity: i64,
    ) {
        self.alerts
            .lock()
            .expect("alerts lock")
            .push((space_id.0, current_count));
    }
}

fn worker_config(consumer_name: &str) -> PipelineConfig {
    PipelineConfig {
        consumer_name: consumer_name.to_string(),
        poll_interval_ms: 50,
        ..PipelineConfig::default()
    }
}

/// Run the worker long enough to drain everything currently enqueued.
async fn run_worker(app: &TestApp, notifier: Arc<dyn AlertNotifier>, consumer_name: &str) {
    let worker = CheckInWorker::new(
        app.redis.clone(),
        app.occupancy.clone(),
        notifier,
        worker_config(consumer_name),
    );
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let handle = tokio::spawn(worker.run(shutdown_rx));

    tokio::time::sleep(Duration::from_millis(600)).await;
    shutdown_tx.send(true).expect("signal shutdown");
    handle.await.expect("worker task");
}

#[tokio::test]
#[ignore = "requires live PostgreSQL and Redis"]
async fn test_published_events_drive_the_counter() {
    let app = TestApp::new().await;
    let space = SpaceId(301);
    let producer = CheckInProducer::new(app.redis.clone());

    producer.publish(space, "u-1", CheckInAction::In).await.expect("publish");
    producer.publish(space, "u-2", CheckInAction::In).await.expect("publish");
    producer.publish(space, "u-1", CheckInAction::Out).await.expect("publish");

    run_worker(&app, Arc::new(RecordingNotifier::default()), "drive-counter").await;

    assert_eq!(app.occupancy.current_count(space).await.unwrap(), 1);
}

#[tokio::test]
#[ignore = "requires live PostgreSQL and Redis"]
async fn test_redelivered_event_id_applies_once() {
    let app = TestApp::new().await;
    let space = SpaceId(302);
    let producer = CheckInProducer::new(app.redis.clone());

    // The same event enqueued twice, as a retrying producer would.
    let event = CheckInEvent {
        event_id: Some(Uuid::new_v4()),
        space_id: space,
        user_id: "u-9".to_string(),
        action: CheckInAction::In,
    };
    producer.publish_event(&event).await.expect("publish");
    producer.publish_event(&event).await.expect("publish");

    run_worker(&app, Arc::new(RecordingNotifier::default()), "dedup").await;

    assert_eq!(app.occupancy.current_count(space).await.unwrap(), 1);
}

#[tokio::test]
#[ignore = "requires live PostgreSQL and Redis"]
async fn test_unparseable_event_is_discarded_without_blocking() {
    let app = TestApp::new().await;
    let space = SpaceId(303);

    // Enqueue garbage directly, ahead of a valid scan.
    let stream = app.redis.prefixed_key(&keys::checkin_stream(space));
    let registry = app.redis.prefixed_key(&keys::checkin_spaces());
    let mut conn = app.redis.conn_mut();
    let _: String = conn
        .xadd(&stream, "*", &[("payload", "not json")])
        .await
        .expect("xadd");
    let _: () = conn.sadd(&registry, space.0).await.expect("sadd");

    let producer = CheckInProducer::new(app.redis.clone());
    producer.publish(space, "u-3", CheckInAction::In).await.expect("publish");

    run_worker(&app, Arc::new(RecordingNotifier::default()), "discard").await;

    // The garbage entry was acknowledged and dropped; the scan behind it
    // still applied.
    assert_eq!(app.occupancy.current_count(space).await.unwrap(), 1);
}

#[tokio::test]
#[ignore = "requires live PostgreSQL and Redis"]
async fn test_alert_fires_once_at_threshold_crossing() {
    let app = TestApp::new().await;
    let space = SpaceId(304);
    app.occupancy.set_capacity(space, 50).await.expect("capacity");

    let producer = CheckInProducer::new(app.redis.clone());
    // Default threshold 0.8 of 50: the 40th entry crosses, the 41st must
    // not re-fire.
    for i in 0..41 {
        producer
            .publish(space, &format!("u-{i}"), CheckInAction::In)
            .await
            .expect("publish");
    }

    let notifier = Arc::new(RecordingNotifier::default());
    run_worker(&app, notifier.clone(), "alert").await;

    assert_eq!(app.occupancy.current_count(space).await.unwrap(), 41);
    let alerts = notifier.alerts.lock().expect("alerts lock");
    assert_eq!(alerts.as_slice(), &[(space.0, 40)]);
}

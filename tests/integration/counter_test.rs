//! Integration tests for the occupancy counter store against live Redis.

use venuepulse_core::types::id::SpaceId;

use crate::helpers::TestApp;

#[tokio::test]
#[ignore = "requires live PostgreSQL and Redis"]
async fn test_counter_is_in_minus_out_floored_at_zero() {
    let app = TestApp::new().await;
    let space = SpaceId(1);

    for _ in 0..3 {
        app.occupancy.record_entry(space).await.expect("entry");
    }
    assert_eq!(app.occupancy.current_count(space).await.unwrap(), 3);

    for _ in 0..5 {
        app.occupancy.record_exit(space).await.expect("exit");
    }
    // OUT events past zero clamp instead of going negative.
    assert_eq!(app.occupancy.current_count(space).await.unwrap(), 0);

    app.occupancy.record_entry(space).await.expect("entry");
    assert_eq!(app.occupancy.current_count(space).await.unwrap(), 1);
}

#[tokio::test]
#[ignore = "requires live PostgreSQL and Redis"]
async fn test_counters_are_isolated_per_space() {
    let app = TestApp::new().await;

    app.occupancy.record_entry(SpaceId(10)).await.expect("entry");
    app.occupancy.record_entry(SpaceId(10)).await.expect("entry");
    app.occupancy.record_entry(SpaceId(11)).await.expect("entry");

    assert_eq!(app.occupancy.current_count(SpaceId(10)).await.unwrap(), 2);
    assert_eq!(app.occupancy.current_count(SpaceId(11)).await.unwrap(), 1);
    assert_eq!(app.occupancy.current_count(SpaceId(12)).await.unwrap(), 0);
}

#[tokio::test]
#[ignore = "requires live PostgreSQL and Redis"]
async fn test_snapshot_combines_count_and_capacity() {
    let app = TestApp::new().await;
    let space = SpaceId(20);

    app.occupancy.set_capacity(space, 30).await.expect("capacity");
    app.occupancy.record_entry(space).await.expect("entry");
    app.occupancy.record_entry(space).await.expect("entry");

    let snapshot = app.occupancy.snapshot(space).await.expect("snapshot");
    assert_eq!(snapshot.current_count, 2);
    assert_eq!(snapshot.max_capacity, 30);
}

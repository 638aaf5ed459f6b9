//! Integration tests for congestion reads.

use axum::http::StatusCode;

use venuepulse_core::types::id::SpaceId;

use crate::helpers::TestApp;

#[tokio::test]
#[ignore = "requires live PostgreSQL and Redis"]
async fn test_congestion_ratio_reflects_live_counter() {
    let app = TestApp::new().await;
    let space_id = app.create_test_space("Arena", 50).await;

    // 45 entries of 50 capacity → 0.9.
    for _ in 0..45 {
        app.occupancy
            .record_entry(SpaceId(space_id))
            .await
            .expect("record entry");
    }

    let response = app
        .request(
            "GET",
            &format!("/api/spaces/{space_id}/congestion"),
            None,
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let ratio = response.body["data"]["ratio"].as_f64().expect("ratio");
    assert!((ratio - 0.9).abs() < 1e-9);
    // First read seeds the smoothed trend with the raw ratio.
    let smoothed = response.body["data"]["smoothed_ratio"]
        .as_f64()
        .expect("smoothed_ratio");
    assert!((smoothed - 0.9).abs() < 1e-9);

    // Five more fills the space; one past capacity stays clamped at 1.0.
    for _ in 0..6 {
        app.occupancy
            .record_entry(SpaceId(space_id))
            .await
            .expect("record entry");
    }
    let response = app
        .request(
            "GET",
            &format!("/api/spaces/{space_id}/congestion"),
            None,
            None,
        )
        .await;
    assert_eq!(response.body["data"]["ratio"].as_f64().unwrap(), 1.0);
    // Smoothed trend lags the jump: 0.9 + 0.2 * (1.0 - 0.9).
    let smoothed = response.body["data"]["smoothed_ratio"].as_f64().unwrap();
    assert!((smoothed - 0.92).abs() < 1e-9);
}

#[tokio::test]
#[ignore = "requires live PostgreSQL and Redis"]
async fn test_congestion_for_unknown_space_is_404() {
    let app = TestApp::new().await;
    let response = app
        .request("GET", "/api/spaces/999999/congestion", None, None)
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

//! Integration tests for the reservation flow.

use axum::http::StatusCode;
use uuid::Uuid;

use venuepulse_entity::user::UserRole;

use crate::helpers::TestApp;

fn visit_time() -> String {
    (chrono::Utc::now() + chrono::Duration::hours(2)).to_rfc3339()
}

#[tokio::test]
#[ignore = "requires live PostgreSQL and Redis"]
async fn test_create_and_cancel_reservation() {
    let app = TestApp::new().await;
    let space_id = app.create_test_space("Main Hall", 50).await;
    let user = Uuid::new_v4();
    let token = app.issue_token(user, UserRole::Member, "alice");

    let response = app
        .request(
            "POST",
            "/api/reservations",
            Some(serde_json::json!({"space_id": space_id, "visit_time": visit_time()})),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["status"], "SUCCESS");
    let reservation_id = response.body["data"]["reservation_id"]
        .as_i64()
        .expect("reservation_id");

    let response = app
        .request(
            "DELETE",
            &format!("/api/reservations/{reservation_id}"),
            None,
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    // Booked count is released on cancel.
    let count: i32 = sqlx::query_scalar("SELECT current_count FROM spaces WHERE id = $1")
        .bind(space_id)
        .fetch_one(&app.db_pool)
        .await
        .expect("read booked count");
    assert_eq!(count, 0);
}

#[tokio::test]
#[ignore = "requires live PostgreSQL and Redis"]
async fn test_second_create_is_duplicate() {
    let app = TestApp::new().await;
    let space_id = app.create_test_space("Gym A", 30).await;
    let other_space = app.create_test_space("Gym B", 30).await;
    let user = Uuid::new_v4();
    let token = app.issue_token(user, UserRole::Member, "bob");

    let body = serde_json::json!({"space_id": space_id, "visit_time": visit_time()});
    let response = app
        .request("POST", "/api/reservations", Some(body), Some(&token))
        .await;
    assert_eq!(response.body["data"]["status"], "SUCCESS");

    // A second create, even for a different space, is rejected as a
    // duplicate and leaves booked counts untouched.
    let body = serde_json::json!({"space_id": other_space, "visit_time": visit_time()});
    let response = app
        .request("POST", "/api/reservations", Some(body), Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["status"], "DUPLICATE");

    let count: i32 = sqlx::query_scalar("SELECT current_count FROM spaces WHERE id = $1")
        .bind(other_space)
        .fetch_one(&app.db_pool)
        .await
        .expect("read booked count");
    assert_eq!(count, 0);
}

#[tokio::test]
#[ignore = "requires live PostgreSQL and Redis"]
async fn test_member_cannot_cancel_another_users_reservation() {
    let app = TestApp::new().await;
    let space_id = app.create_test_space("Studio", 20).await;
    let owner_token = app.issue_token(Uuid::new_v4(), UserRole::Member, "owner");
    let other_token = app.issue_token(Uuid::new_v4(), UserRole::Member, "other");

    let response = app
        .request(
            "POST",
            "/api/reservations",
            Some(serde_json::json!({"space_id": space_id, "visit_time": visit_time()})),
            Some(&owner_token),
        )
        .await;
    let reservation_id = response.body["data"]["reservation_id"].as_i64().unwrap();

    let response = app
        .request(
            "DELETE",
            &format!("/api/reservations/{reservation_id}"),
            None,
            Some(&other_token),
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    // An admin may cancel anyone's reservation.
    let admin_token = app.issue_token(Uuid::new_v4(), UserRole::Admin, "admin");
    let response = app
        .request(
            "DELETE",
            &format!("/api/reservations/{reservation_id}"),
            None,
            Some(&admin_token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
#[ignore = "requires live PostgreSQL and Redis"]
async fn test_active_reservation_endpoint() {
    let app = TestApp::new().await;
    let space_id = app.create_test_space("Pool", 40).await;
    let token = app.issue_token(Uuid::new_v4(), UserRole::Member, "carol");

    let response = app
        .request("GET", "/api/reservations/active", None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body["data"].is_null());

    app.request(
        "POST",
        "/api/reservations",
        Some(serde_json::json!({"space_id": space_id, "visit_time": visit_time()})),
        Some(&token),
    )
    .await;

    let response = app
        .request("GET", "/api/reservations/active", None, Some(&token))
        .await;
    assert_eq!(response.body["data"]["status"], "CONFIRMED");
}

#[tokio::test]
#[ignore = "requires live PostgreSQL and Redis"]
async fn test_unauthenticated_request_is_rejected() {
    let app = TestApp::new().await;
    let response = app
        .request("GET", "/api/reservations/active", None, None)
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

//! Integration tests for carrying an unspent balance into the next month.

mod common;

use axum::http::StatusCode;
use common::TestClient;

/// Leaves 1000 - 600 - 100 (savings) = 300 unspent.
async fn seed_february(client: &TestClient) {
    assert!(client.create_income("2026-02-01", "1000", "Salary").await);
    assert!(client.create_expense("2026-02-10", "600", "housing", "Rent").await);
    assert!(client.create_expense("2026-02-20", "100", "investments", "ETF").await);
}

#[tokio::test]
async fn test_status_reports_previous_net() {
    let client = TestClient::new();
    seed_february(&client).await;

    let (status, json) = client.get_json("/api/months/2026-03/carry-over").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["from_period"], "2026-02");
    assert_eq!(json["from_label"], "February 2026");
    assert_eq!(json["amount_cents"], 30000);
    assert_eq!(json["already_carried_over"], false);
    assert_eq!(json["pending"], true);
}

#[tokio::test]
async fn test_transfer_creates_income_once() {
    let client = TestClient::new();
    seed_february(&client).await;

    let (status, json) = client.post_json("/api/months/2026-03/carry-over").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["income"]["date"], "2026-03-01");
    assert_eq!(json["income"]["amount_cents"], 30000);
    assert_eq!(json["income"]["source"], "Carried over from February 2026");

    let (_, json) = client.get_json("/api/months/2026-03/carry-over").await;
    assert_eq!(json["already_carried_over"], true);
    assert_eq!(json["pending"], false);

    let (status, json) = client.post_json("/api/months/2026-03/carry-over").await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(json["error"].is_string());

    let (_, json) = client.get_json("/api/months/2026-03/income").await;
    assert_eq!(json.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_nothing_to_carry_when_previous_month_overspent() {
    let client = TestClient::new();
    client.create_income("2026-02-01", "100", "Salary").await;
    client.create_expense("2026-02-03", "150", "travel", "Flights").await;

    let (_, json) = client.get_json("/api/months/2026-03/carry-over").await;
    assert!(json["amount_cents"].is_null());
    assert_eq!(json["pending"], false);

    let (status, json) = client.post_json("/api/months/2026-03/carry-over").await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["income"].is_null());
}

#[tokio::test]
async fn test_dashboard_form_carries_over_and_redirects() {
    let client = TestClient::new();
    seed_february(&client).await;

    let (_, body) = client.get("/?month=2026-03").await;
    assert!(body.contains("Carry over to March 2026"));

    let (status, location, _) = client.post_form("/carry-over?month=2026-03", &[]).await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location.as_deref(), Some("/?month=2026-03"));

    let (_, body) = client.get("/?month=2026-03").await;
    assert!(!body.contains("Carry over to March 2026"));
    assert!(body.contains("has been carried over"));

    let (status, _, _) = client.post_form("/carry-over?month=2026-03", &[]).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

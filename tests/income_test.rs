//! Integration tests for the income pages.

mod common;

use axum::http::StatusCode;
use common::TestClient;

#[tokio::test]
async fn test_create_and_list_income() {
    let client = TestClient::new();

    let (status, location, _) = client
        .post_form(
            "/income/create",
            &[
                ("date", "2026-03-01"),
                ("amount", "2500"),
                ("source", "  Salary "),
                ("note", "March pay"),
            ],
        )
        .await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location.as_deref(), Some("/income?month=2026-03"));

    let (status, body) = client.get("/income").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Salary"));
    assert!(body.contains("March pay"));
    assert!(body.contains("$2,500.00"));

    let (_, json) = client.get_json("/api/months/2026-03/income").await;
    assert_eq!(json.as_array().unwrap().len(), 1);
    assert_eq!(json[0]["source"], "Salary");
    assert_eq!(json[0]["amount_cents"], 250000);
}

#[tokio::test]
async fn test_income_requires_source_and_positive_amount() {
    let client = TestClient::new();

    let (status, _, _) = client
        .post_form(
            "/income/create",
            &[("date", "2026-03-01"), ("amount", "100"), ("source", "   ")],
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _, _) = client
        .post_form(
            "/income/create",
            &[("date", "2026-03-01"), ("amount", "0"), ("source", "Gift")],
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, json) = client.get_json("/api/months/2026-03/income").await;
    assert!(json.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_update_and_delete_income() {
    let client = TestClient::new();
    assert!(client.create_income("2026-03-05", "40", "Freelance").await);

    let (_, json) = client.get_json("/api/months/2026-03/income").await;
    let id = json[0]["id"].as_str().unwrap().to_string();

    let (status, body) = client.get(&format!("/income/{}/edit", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Freelance"));
    assert!(body.contains("40.00"));

    let (status, location, _) = client
        .post_form(
            &format!("/income/{}/update", id),
            &[
                ("date", "2026-02-28"),
                ("amount", "45"),
                ("source", "Consulting"),
                ("note", ""),
            ],
        )
        .await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location.as_deref(), Some("/income?month=2026-02"));

    let (_, json) = client.get_json("/api/months/2026-02/income").await;
    assert_eq!(json[0]["source"], "Consulting");
    assert_eq!(json[0]["amount_cents"], 4500);

    let (status, _, _) = client.post_form(&format!("/income/{}/delete", id), &[]).await;
    assert_eq!(status, StatusCode::SEE_OTHER);

    let (_, json) = client.get_json("/api/months/2026-02/income").await;
    assert!(json.as_array().unwrap().is_empty());

    let (status, _) = client.get(&format!("/income/{}/edit", id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

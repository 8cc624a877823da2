//! Integration tests for the expense pages: CRUD, validation and filtering.

mod common;

use axum::http::StatusCode;
use common::TestClient;

#[tokio::test]
async fn test_expenses_page_renders_empty_month() {
    let client = TestClient::new();

    let (status, body) = client.get("/expenses").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("March 2026"));
    assert!(body.contains("No expenses match."));
}

#[tokio::test]
async fn test_create_expense_redirects_to_its_month() {
    let client = TestClient::new();

    let (status, location, _) = client
        .post_form(
            "/expenses/create",
            &[
                ("date", "2026-02-10"),
                ("amount", "12.50"),
                ("category_id", "groceries"),
                ("note", "Weekly shop"),
            ],
        )
        .await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location.as_deref(), Some("/expenses?month=2026-02"));

    let (status, body) = client.get("/expenses?month=2026-02").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Weekly shop"));
    assert!(body.contains("$12.50"));
    assert!(body.contains("Groceries"));
}

#[tokio::test]
async fn test_create_expense_rejects_invalid_input() {
    let client = TestClient::new();

    let cases = [
        ("2026-03-01", "0", "groceries"),
        ("2026-03-01", "-4.00", "groceries"),
        ("2026-03-01", "abc", "groceries"),
        ("2026-03-01", "1e20", "groceries"),
        ("03/01/2026", "4.00", "groceries"),
        ("2026-03-01", "4.00", "spaceships"),
    ];
    for (date, amount, category) in cases {
        let (status, _, _) = client
            .post_form(
                "/expenses/create",
                &[
                    ("date", date),
                    ("amount", amount),
                    ("category_id", category),
                    ("note", ""),
                ],
            )
            .await;
        assert_eq!(
            status,
            StatusCode::BAD_REQUEST,
            "expected 400 for {date} / {amount} / {category}"
        );
    }

    assert!(client.expense_ids("2026-03").await.is_empty());
}

#[tokio::test]
async fn test_edit_update_and_delete_expense() {
    let client = TestClient::new();
    assert!(client.create_expense("2026-03-02", "20", "fuel", "Full tank").await);

    let ids = client.expense_ids("2026-03").await;
    assert_eq!(ids.len(), 1);
    let id = &ids[0];

    let (status, body) = client.get(&format!("/expenses/{}/edit", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Full tank"));
    assert!(body.contains("20.00"));

    let (status, location, _) = client
        .post_form(
            &format!("/expenses/{}/update", id),
            &[
                ("date", "2026-03-03"),
                ("amount", "25.75"),
                ("category_id", "parking"),
                ("note", ""),
            ],
        )
        .await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location.as_deref(), Some("/expenses?month=2026-03"));

    let (_, json) = client.get_json("/api/expenses?month=2026-03").await;
    assert_eq!(json[0]["amount_cents"], 2575);
    assert_eq!(json[0]["category_id"], "parking");
    assert!(json[0]["note"].is_null());

    let (status, _, _) = client
        .post_form(&format!("/expenses/{}/delete", id), &[])
        .await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert!(client.expense_ids("2026-03").await.is_empty());
}

#[tokio::test]
async fn test_missing_expense_is_not_found() {
    let client = TestClient::new();

    let (status, _) = client.get("/expenses/does-not-exist/edit").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _, _) = client
        .post_form(
            "/expenses/does-not-exist/update",
            &[
                ("date", "2026-03-03"),
                ("amount", "1"),
                ("category_id", "fuel"),
                ("note", ""),
            ],
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _, _) = client
        .post_form("/expenses/does-not-exist/delete", &[])
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_filter_by_category_and_search() {
    let client = TestClient::new();
    client.create_expense("2026-03-01", "10", "groceries", "Farmers market").await;
    client.create_expense("2026-03-02", "30", "fuel", "Road trip").await;
    client.create_expense("2026-03-03", "5", "groceries", "Bakery").await;

    let (_, json) = client
        .get_json("/api/expenses?month=2026-03&category=groceries")
        .await;
    let notes: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["note"].as_str().unwrap())
        .collect();
    assert_eq!(notes, vec!["Bakery", "Farmers market"]);

    let (_, json) = client.get_json("/api/expenses?month=2026-03&q=%20ROAD%20").await;
    assert_eq!(json.as_array().unwrap().len(), 1);
    assert_eq!(json[0]["note"], "Road trip");

    let (status, body) = client.get("/expenses?month=2026-03&q=bakery").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Bakery"));
    assert!(!body.contains("Road trip"));
}

#[tokio::test]
async fn test_sort_by_amount_ascending() {
    let client = TestClient::new();
    client.create_expense("2026-03-01", "10", "groceries", "b").await;
    client.create_expense("2026-03-02", "30", "fuel", "c").await;
    client.create_expense("2026-03-03", "5", "groceries", "a").await;

    let (_, json) = client
        .get_json("/api/expenses?month=2026-03&sort=amount&dir=asc")
        .await;
    let amounts: Vec<i64> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["amount_cents"].as_i64().unwrap())
        .collect();
    assert_eq!(amounts, vec![500, 1000, 3000]);
}

#[tokio::test]
async fn test_today_scope_and_savings_toggle() {
    let client = TestClient::new();
    client.create_expense(common::TODAY, "8", "food_dining", "Lunch").await;
    client.create_expense("2026-03-01", "100", "investments", "Index fund").await;

    let (_, json) = client.get_json("/api/expenses?month=2026-03&scope=today").await;
    assert_eq!(json.as_array().unwrap().len(), 1);
    assert_eq!(json[0]["note"], "Lunch");

    let (_, json) = client.get_json("/api/expenses?month=2026-03&savings=0").await;
    assert_eq!(json.as_array().unwrap().len(), 1);
    assert_eq!(json[0]["category_id"], "food_dining");

    let (_, json) = client.get_json("/api/expenses?month=2026-03").await;
    assert_eq!(json.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_invalid_month_is_rejected() {
    let client = TestClient::new();

    let (status, _) = client.get("/expenses?month=2026-13").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, json) = client.get_json("/api/expenses?month=march").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].is_string());
}

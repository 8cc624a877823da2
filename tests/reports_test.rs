//! Integration tests for the CSV report export.

mod common;

use axum::http::StatusCode;
use common::TestClient;

#[tokio::test]
async fn test_export_defaults_to_current_month() {
    let client = TestClient::new();
    client.create_income("2026-03-01", "1000", "Salary").await;
    client.create_expense("2026-03-04", "42.50", "groceries", "Market").await;
    client.create_expense("2026-02-27", "99", "fuel", "Last month").await;

    let (status, headers, body) = client.get_with_headers("/reports/export").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers["content-type"], "text/csv; charset=utf-8");
    assert_eq!(
        headers["content-disposition"],
        "attachment; filename=\"expense-report-2026-03-01-to-2026-03-31.csv\""
    );

    assert!(body.starts_with("Expense Report,2026-03-01,2026-03-31"));
    assert!(body.contains("Income,1000.00"));
    assert!(body.contains("Total Expenses,42.50"));
    assert!(body.contains("Net,957.50"));
    assert!(body.contains("Salary,1000.00"));
    assert!(body.contains("Groceries,42.50"));
    assert!(body.contains("2026-03-04,Market,Expense,42.50"));
    assert!(!body.contains("Last month"));
}

#[tokio::test]
async fn test_export_custom_range() {
    let client = TestClient::new();
    client.create_expense("2026-01-15", "10", "fuel", "January").await;
    client.create_expense("2026-02-15", "20", "fuel", "February").await;

    let (status, headers, body) = client
        .get_with_headers("/reports/export?from=2026-01-01&to=2026-02-28")
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(headers["content-disposition"]
        .to_str()
        .unwrap()
        .contains("expense-report-2026-01-01-to-2026-02-28.csv"));
    assert!(body.contains("January"));
    assert!(body.contains("February"));
    assert!(body.contains("Fuel,30.00"));
}

#[tokio::test]
async fn test_export_rejects_inverted_range() {
    let client = TestClient::new();

    let (status, _) = client
        .get("/reports/export?from=2026-03-31&to=2026-03-01")
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = client.get("/reports/export?from=yesterday").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

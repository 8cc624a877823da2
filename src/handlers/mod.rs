pub mod api;
pub mod dashboard;
pub mod expenses;
pub mod income;
pub mod reports;

use axum::routing::{get, post};
use axum::Router;
use serde::Deserialize;

use crate::date_utils::Period;
use crate::error::{AppError, AppResult};
use crate::models::category;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        // Pages
        .route("/", get(dashboard::index))
        .route("/carry-over", post(dashboard::carry_over))
        .route("/migrate-local", post(dashboard::migrate_local))
        .route("/expenses", get(expenses::index))
        .route("/income", get(income::index))
        // Expense CRUD
        .route("/expenses/create", post(expenses::create))
        .route("/expenses/:id/edit", get(expenses::edit_form))
        .route("/expenses/:id/update", post(expenses::update))
        .route("/expenses/:id/delete", post(expenses::delete))
        // Income CRUD
        .route("/income/create", post(income::create))
        .route("/income/:id/edit", get(income::edit_form))
        .route("/income/:id/update", post(income::update))
        .route("/income/:id/delete", post(income::delete))
        // Reports
        .route("/reports/export", get(reports::export))
        // API (JSON)
        .route("/api/months/:month/summary", get(api::month_summary))
        .route("/api/months/:month/treemap", get(api::month_treemap))
        .route(
            "/api/months/:month/carry-over",
            get(api::carry_over_status).post(api::carry_over_transfer),
        )
        .route("/api/months/:month/income", get(api::month_income))
        .route("/api/expenses", get(api::list_expenses))
        .route("/api/migrate-local", post(api::migrate_local))
        // Health check
        .route("/health", get(health))
}

async fn health() -> &'static str {
    "OK"
}

#[derive(Debug, Default, Deserialize)]
pub struct MonthQuery {
    pub month: Option<String>,
}

/// The requested month, or the current one when none was given.
pub(crate) fn resolve_period(month: Option<&str>, state: &AppState) -> AppResult<Period> {
    match month.map(str::trim) {
        None | Some("") => Ok(state.current_period()),
        Some(raw) => parse_period(raw),
    }
}

pub(crate) fn parse_period(raw: &str) -> AppResult<Period> {
    raw.parse()
        .map_err(|e: crate::date_utils::InvalidPeriod| AppError::Validation(e.to_string()))
}

pub(crate) fn validate_category(id: &str) -> AppResult<()> {
    if category::is_known(id) {
        Ok(())
    } else {
        Err(AppError::Validation(format!("Unknown category '{}'", id)))
    }
}

/// Select options for the category picker, grouped like the registry.
#[derive(Debug, Clone)]
pub struct CategoryGroup {
    pub name: &'static str,
    pub options: Vec<CategoryOption>,
}

#[derive(Debug, Clone)]
pub struct CategoryOption {
    pub id: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

pub(crate) fn category_groups(selected: &str) -> Vec<CategoryGroup> {
    category::by_group()
        .into_iter()
        .map(|(name, categories)| CategoryGroup {
            name,
            options: categories
                .into_iter()
                .map(|c| CategoryOption {
                    id: c.id,
                    label: c.label,
                    selected: c.id == selected,
                })
                .collect(),
        })
        .collect()
}

/// Options for a month picker: `months` plus `current`, newest first.
#[derive(Debug, Clone)]
pub struct MonthOption {
    pub key: String,
    pub label: String,
    pub selected: bool,
}

pub(crate) fn month_options(mut months: Vec<Period>, current: Period) -> Vec<MonthOption> {
    if !months.contains(&current) {
        months.push(current);
    }
    months.sort_by(|a, b| b.cmp(a));
    months
        .into_iter()
        .map(|p| MonthOption {
            key: p.key(),
            label: p.label(),
            selected: p == current,
        })
        .collect()
}

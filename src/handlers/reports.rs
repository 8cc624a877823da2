use axum::extract::{Query, State};
use axum::http::header;
use axum::response::IntoResponse;
use serde::Deserialize;
use tracing::info;

use crate::error::{AppError, AppResult};
use crate::form_utils::parse_form_date;
use crate::services::report;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ReportQuery {
    pub from: Option<String>,
    pub to: Option<String>,
}

/// Download the report for `[from, to]` as CSV. Either bound defaults to the
/// corresponding edge of the current month.
pub async fn export(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> AppResult<impl IntoResponse> {
    let current = state.current_period();
    let from = match query.from.as_deref().map(str::trim) {
        None | Some("") => current.first_day_str(),
        Some(raw) => parse_form_date(raw)?,
    };
    let to = match query.to.as_deref().map(str::trim) {
        None | Some("") => current.last_day_str(),
        Some(raw) => parse_form_date(raw)?,
    };
    if from > to {
        return Err(AppError::Validation(format!(
            "Report start {} is after its end {}",
            from, to
        )));
    }

    let income = state.store.list_income_between(&from, &to).await?;
    let expenses = state.store.list_expenses_between(&from, &to).await?;
    let report = report::build(&from, &to, &income, &expenses);

    let mut body = Vec::new();
    report::write_csv(&report, &mut body)?;
    info!(
        from = %from,
        to = %to,
        income = income.len(),
        expenses = expenses.len(),
        "Exported report"
    );

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", report.file_name()),
            ),
        ],
        body,
    ))
}

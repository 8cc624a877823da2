use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::date_utils::Period;
use crate::error::ApiResult;
use crate::handlers::dashboard::{
    load_overview, migrate_local_records, transfer_carry_over, CHART_HEIGHT, CHART_WIDTH,
};
use crate::handlers::{parse_period, resolve_period};
use crate::models::{Expense, Income, IncomeSummary, MonthSummary};
use crate::services::carry_over::{self, CarryOverStatus};
use crate::services::expense_filter::{self, ExpenseFilter, ExpenseFilterParams};
use crate::services::summary::summarize_expenses;
use crate::services::treemap::{self, TreemapRect};
use crate::state::AppState;
use crate::storage::migrate::MigrationReport;

#[derive(Debug, Serialize)]
pub struct MonthSummaryResponse {
    pub period: Period,
    pub label: String,
    pub expenses: MonthSummary,
    pub income: IncomeSummary,
    pub net_cents: i64,
    pub savings_rate: f64,
    pub carry_over: CarryOverResponse,
}

#[derive(Debug, Serialize)]
pub struct CarryOverResponse {
    #[serde(flatten)]
    pub status: CarryOverStatus,
    pub pending: bool,
}

impl From<CarryOverStatus> for CarryOverResponse {
    fn from(status: CarryOverStatus) -> Self {
        Self {
            pending: status.is_pending(),
            status,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TransferResponse {
    pub income: Option<Income>,
}

#[derive(Debug, Deserialize)]
pub struct TreemapQuery {
    pub width: Option<f64>,
    pub height: Option<f64>,
}

pub async fn month_summary(
    State(state): State<AppState>,
    Path(month): Path<String>,
) -> ApiResult<MonthSummaryResponse> {
    let period = parse_period(&month)?;
    let overview = load_overview(&state, period).await?;

    Ok(Json(MonthSummaryResponse {
        period: overview.period,
        label: overview.period.label(),
        net_cents: overview.net_cents(),
        savings_rate: overview.savings_rate(),
        expenses: overview.expenses,
        income: overview.income,
        carry_over: overview.carry_over.into(),
    }))
}

pub async fn month_treemap(
    State(state): State<AppState>,
    Path(month): Path<String>,
    Query(query): Query<TreemapQuery>,
) -> ApiResult<Vec<TreemapRect>> {
    let period = parse_period(&month)?;
    let width = query.width.unwrap_or(CHART_WIDTH);
    let height = query.height.unwrap_or(CHART_HEIGHT);

    let expenses = state.store.list_expenses(period).await?;
    let items = treemap::items_from_summary(&summarize_expenses(&expenses));
    debug!(period = %period, items = items.len(), width, height, "Laying out treemap");

    Ok(Json(treemap::layout(&items, width, height)))
}

pub async fn carry_over_status(
    State(state): State<AppState>,
    Path(month): Path<String>,
) -> ApiResult<CarryOverResponse> {
    let period = parse_period(&month)?;
    let status = carry_over::resolve(state.store.as_ref(), period).await?;
    Ok(Json(status.into()))
}

/// 409 when the previous month was already carried over into this one.
pub async fn carry_over_transfer(
    State(state): State<AppState>,
    Path(month): Path<String>,
) -> ApiResult<TransferResponse> {
    let period = parse_period(&month)?;
    let income = transfer_carry_over(&state, period).await?;
    Ok(Json(TransferResponse { income }))
}

pub async fn month_income(
    State(state): State<AppState>,
    Path(month): Path<String>,
) -> ApiResult<Vec<Income>> {
    let period = parse_period(&month)?;
    Ok(Json(state.store.list_income(period).await?))
}

/// Filtered expenses for `?month=` (default: current month).
pub async fn list_expenses(
    State(state): State<AppState>,
    Query(params): Query<ExpenseFilterParams>,
) -> ApiResult<Vec<Expense>> {
    let period = resolve_period(params.month.as_deref(), &state)?;
    let filter = ExpenseFilter::from_params(&params);
    let expenses = state.store.list_expenses(period).await?;
    Ok(Json(expense_filter::apply(&expenses, &filter, state.today())))
}

/// Move every on-device record into the remote store.
pub async fn migrate_local(State(state): State<AppState>) -> ApiResult<MigrationReport> {
    Ok(Json(migrate_local_records(&state).await?))
}

use askama::Template;
use axum::extract::{Query, State};
use axum::response::{Html, Redirect};
use tracing::{debug, info, warn};

use crate::date_utils::Period;
use crate::error::{AppError, AppResult, RenderHtml};
use crate::filters::Money;
use crate::handlers::{resolve_period, MonthQuery};
use crate::models::{category, Expense, Income, IncomeSummary, MonthSummary};
use crate::services::carry_over::{self, CarryOverStatus};
use crate::services::summary::{net_of, savings_rate, summarize_expenses, summarize_income};
use crate::services::treemap::{self, TreemapRect};
use crate::state::AppState;
use crate::storage::migrate::{migrate_store, MigrationReport};
use crate::storage::TransactionStore;
use crate::VERSION;

pub const CHART_WIDTH: f64 = 640.0;
pub const CHART_HEIGHT: f64 = 320.0;

/// Everything derived from one month of transactions.
pub(crate) struct MonthOverview {
    pub period: Period,
    pub expenses: MonthSummary,
    pub income: IncomeSummary,
    pub carry_over: CarryOverStatus,
}

impl MonthOverview {
    pub fn net_cents(&self) -> i64 {
        net_of(
            self.income.total_cents,
            self.expenses.total_cents,
            self.expenses.savings_cents,
        )
    }

    pub fn savings_rate(&self) -> f64 {
        savings_rate(&self.expenses, &self.income)
    }
}

pub(crate) async fn load_overview(state: &AppState, period: Period) -> AppResult<MonthOverview> {
    let store = state.store.as_ref();
    let expenses: Vec<Expense> = store.list_expenses(period).await?;
    let income: Vec<Income> = store.list_income(period).await?;
    let carry_over = carry_over::resolve(store, period).await?;

    debug!(
        period = %period,
        expenses = expenses.len(),
        income = income.len(),
        "Month data loaded"
    );

    Ok(MonthOverview {
        period,
        expenses: summarize_expenses(&expenses),
        income: summarize_income(&income),
        carry_over,
    })
}

/// Carry the previous month's balance into `period`, at most once.
pub(crate) async fn transfer_carry_over(state: &AppState, period: Period) -> AppResult<Option<Income>> {
    let store = state.store.as_ref();
    let status = carry_over::resolve(store, period).await?;
    if status.already_carried_over {
        warn!(period = %period, from = %status.from_label, "Carry-over rejected, already done");
        return Err(AppError::Conflict(format!(
            "The balance from {} was already carried over",
            status.from_label
        )));
    }
    Ok(carry_over::transfer(store, &status, period).await?)
}

pub struct CategoryRow {
    pub label: &'static str,
    pub amount: String,
    pub share: String,
    pub count: usize,
    pub color: &'static str,
}

pub struct DailyRow {
    pub date: String,
    pub amount: String,
    pub count: usize,
    /// Bar width relative to the busiest day, as a CSS percentage.
    pub bar_width: String,
}

pub struct SourceRow {
    pub source: String,
    pub amount: String,
    pub share: String,
    pub is_carried_over: bool,
}

pub struct RectView {
    pub x: String,
    pub y: String,
    pub width: String,
    pub height: String,
    pub color: String,
    pub tooltip: String,
    pub show_label: bool,
    pub label_x: String,
    pub label_y: String,
    pub font_size: String,
    pub share: String,
}

impl RectView {
    fn new(rect: &TreemapRect, money: &Money) -> Self {
        Self {
            x: format!("{:.2}", rect.x),
            y: format!("{:.2}", rect.y),
            width: format!("{:.2}", rect.width),
            height: format!("{:.2}", rect.height),
            color: rect.color.clone(),
            tooltip: format!("{}: {}", rect.name, money.share(rect.percentage)),
            show_label: rect.shows_label(),
            label_x: format!("{:.2}", rect.center_x()),
            label_y: format!("{:.2}", rect.center_y()),
            font_size: format!("{:.1}", rect.font_size()),
            share: money.share(rect.percentage),
        }
    }
}

#[derive(Template)]
#[template(path = "pages/dashboard.html")]
pub struct DashboardTemplate {
    pub title: String,
    pub version: &'static str,
    pub store_kind: &'static str,
    pub period_key: String,
    pub period_label: String,
    pub prev_key: String,
    pub next_key: String,
    pub expense_total: String,
    pub income_total: String,
    pub savings_total: String,
    pub savings_rate: String,
    pub has_savings: bool,
    pub net_html: String,
    pub carry_over_pending: bool,
    pub carry_over_done: bool,
    pub carry_over_label: String,
    pub carry_over_amount: String,
    pub chart_width: f64,
    pub chart_height: f64,
    pub rects: Vec<RectView>,
    pub categories: Vec<CategoryRow>,
    pub daily: Vec<DailyRow>,
    pub sources: Vec<SourceRow>,
    pub report_from: String,
    pub report_to: String,
    pub local_records: usize,
}

pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<MonthQuery>,
) -> AppResult<Html<String>> {
    let period = resolve_period(query.month.as_deref(), &state)?;
    debug!(period = %period, "Loading dashboard");

    let overview = load_overview(&state, period).await?;
    let money = state.money();

    let items = treemap::items_from_summary(&overview.expenses);
    let rects = treemap::layout(&items, CHART_WIDTH, CHART_HEIGHT)
        .iter()
        .map(|rect| RectView::new(rect, &money))
        .collect();

    let categories = overview
        .expenses
        .by_category
        .iter()
        .enumerate()
        .map(|(i, c)| CategoryRow {
            label: category::get_or_other(&c.category_id).label,
            amount: money.neutral(c.total_cents),
            share: money.share(c.percentage),
            count: c.count,
            color: treemap::CHART_COLORS[i % treemap::CHART_COLORS.len()],
        })
        .collect();

    let busiest = overview
        .expenses
        .daily
        .iter()
        .map(|d| d.total_cents)
        .max()
        .unwrap_or(0);
    let daily = overview
        .expenses
        .daily
        .iter()
        .map(|d| DailyRow {
            date: d.date.clone(),
            amount: money.neutral(d.total_cents),
            count: d.count,
            bar_width: format!(
                "{:.1}%",
                crate::services::summary::percentage(d.total_cents, busiest)
            ),
        })
        .collect();

    let sources = overview
        .income
        .by_source
        .iter()
        .map(|s| SourceRow {
            source: s.source.clone(),
            amount: money.neutral(s.total_cents),
            share: money.share(s.percentage),
            is_carried_over: s.is_carried_over,
        })
        .collect();

    let carry = &overview.carry_over;
    let template = DashboardTemplate {
        title: period.label(),
        version: VERSION,
        store_kind: state.store.kind().as_str(),
        period_key: period.key(),
        period_label: period.label(),
        prev_key: period.previous().key(),
        next_key: period.next().key(),
        expense_total: money.neutral(overview.expenses.total_cents),
        income_total: money.neutral(overview.income.total_cents),
        savings_total: money.neutral(overview.expenses.savings_cents),
        savings_rate: money.share(overview.savings_rate()),
        has_savings: overview.expenses.savings_cents > 0,
        net_html: money.colored(overview.net_cents()),
        carry_over_pending: carry.is_pending(),
        carry_over_done: carry.already_carried_over,
        carry_over_label: carry.from_label.clone(),
        carry_over_amount: carry.amount_cents.map(|c| money.neutral(c)).unwrap_or_default(),
        chart_width: CHART_WIDTH,
        chart_height: CHART_HEIGHT,
        rects,
        categories,
        daily,
        sources,
        report_from: period.first_day_str(),
        report_to: period.last_day_str(),
        local_records: local_only_count(&state).await?,
    };

    template.render_html()
}

pub async fn carry_over(
    State(state): State<AppState>,
    Query(query): Query<MonthQuery>,
) -> AppResult<Redirect> {
    let period = resolve_period(query.month.as_deref(), &state)?;
    transfer_carry_over(&state, period).await?;
    Ok(Redirect::to(&format!("/?month={}", period)))
}

/// Records left in the on-device store while the remote store is active.
pub(crate) async fn local_only_count(state: &AppState) -> AppResult<usize> {
    let Some(local) = state.local.as_ref() else {
        return Ok(0);
    };
    let expenses = local.list_all_expenses().await?;
    let income = local.list_all_income().await?;
    Ok(expenses.len() + income.len())
}

/// Move on-device records into the active store. 409 when there is no remote store.
pub(crate) async fn migrate_local_records(state: &AppState) -> AppResult<MigrationReport> {
    let Some(local) = state.local.as_ref() else {
        return Err(AppError::Conflict("The remote store is not configured".into()));
    };

    let report = migrate_store(local.as_ref(), state.store.as_ref()).await?;
    info!(
        transferred = report.transferred,
        success = report.is_success(),
        "Local data migration finished"
    );
    Ok(report)
}

pub async fn migrate_local(State(state): State<AppState>) -> AppResult<Redirect> {
    let report = migrate_local_records(&state).await?;
    match report.error {
        None => Ok(Redirect::to("/")),
        Some(error) => Err(AppError::Internal(format!(
            "Moved {} records, then failed: {}",
            report.transferred, error
        ))),
    }
}

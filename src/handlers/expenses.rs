use askama::Template;
use axum::extract::{Path, Query, State};
use axum::response::{Html, Redirect};
use axum::Form;
use serde::Deserialize;
use tracing::{debug, info};

use crate::date_utils::{Period, DATE_FORMAT};
use crate::error::{AppError, AppResult, RenderHtml};
use crate::filters::{format_decimal, Money};
use crate::form_utils::{deserialize_optional_trimmed, parse_amount_cents, parse_form_date};
use crate::handlers::{
    category_groups, month_options, resolve_period, validate_category, CategoryGroup, MonthOption,
};
use crate::models::{category, Expense, ExpensePatch, NewExpense};
use crate::services::expense_filter::{
    self, CategoryFilter, ExpenseFilter, ExpenseFilterParams, ExpenseSortColumn,
};
use crate::services::summary::sum_cents;
use crate::sort_utils::{SortableColumn, TableSort};
use crate::state::AppState;
use crate::VERSION;

#[derive(Debug, Deserialize)]
pub struct ExpenseFormData {
    pub date: String,
    pub amount: String,
    pub category_id: String,
    #[serde(default, deserialize_with = "deserialize_optional_trimmed")]
    pub note: Option<String>,
}

impl ExpenseFormData {
    fn to_new_expense(&self) -> AppResult<NewExpense> {
        let category_id = self.category_id.trim();
        validate_category(category_id)?;
        Ok(NewExpense {
            date: parse_form_date(&self.date)?,
            amount_cents: parse_amount_cents(&self.amount)?,
            category_id: category_id.to_string(),
            note: self.note.clone(),
        })
    }
}

pub struct ExpenseRow {
    pub id: String,
    pub date: String,
    pub category: &'static str,
    pub icon: &'static str,
    pub note: String,
    pub amount: String,
    pub is_savings: bool,
}

impl ExpenseRow {
    fn new(expense: &Expense, money: &Money) -> Self {
        let category = expense.category();
        Self {
            id: expense.id.clone(),
            date: expense.date.clone(),
            category: category.label,
            icon: category.icon,
            note: expense.note_text().to_string(),
            amount: money.neutral(expense.amount_cents),
            is_savings: expense.is_savings(),
        }
    }
}

pub struct SortHeader {
    pub label: &'static str,
    pub href: String,
    pub indicator: &'static str,
}

#[derive(Template)]
#[template(path = "pages/expenses.html")]
pub struct ExpensesTemplate {
    pub title: String,
    pub version: &'static str,
    pub store_kind: &'static str,
    pub period_key: String,
    pub period_label: String,
    pub months: Vec<MonthOption>,
    pub groups: Vec<CategoryGroup>,
    pub filter_groups: Vec<CategoryGroup>,
    pub search: String,
    pub scope: String,
    pub include_savings: bool,
    pub sort_by: &'static str,
    pub sort_dir: &'static str,
    pub filter_active: bool,
    pub headers: Vec<SortHeader>,
    pub rows: Vec<ExpenseRow>,
    pub shown_total: String,
    pub today: String,
}

#[derive(Template)]
#[template(path = "pages/expense_edit.html")]
pub struct ExpenseEditTemplate {
    pub title: String,
    pub version: &'static str,
    pub store_kind: &'static str,
    pub id: String,
    pub date: String,
    pub amount: String,
    pub note: String,
    pub groups: Vec<CategoryGroup>,
}

fn sort_headers(period: Period, filter: &ExpenseFilter) -> Vec<SortHeader> {
    let sort: TableSort<ExpenseSortColumn> = filter.sort();
    let base = match filter.filter_query() {
        q if q.is_empty() => format!("/expenses?month={}", period),
        q => format!("/expenses?month={}&{}", period, q),
    };
    [("Date", "date"), ("Category", "category"), ("Amount", "amount")]
        .into_iter()
        .map(|(label, column)| SortHeader {
            label,
            href: format!("{}&{}", base, sort.query_string_for_str(column)),
            indicator: sort.indicator_str(column),
        })
        .collect()
}

pub async fn index(
    State(state): State<AppState>,
    Query(params): Query<ExpenseFilterParams>,
) -> AppResult<Html<String>> {
    let period = resolve_period(params.month.as_deref(), &state)?;
    let filter = ExpenseFilter::from_params(&params);
    let today = state.today();
    debug!(period = %period, ?filter, "Loading expenses");

    let store = state.store.as_ref();
    let expenses = store.list_expenses(period).await?;
    let all_months = expense_filter::available_months(&store.list_all_expenses().await?);

    let shown = expense_filter::apply(&expenses, &filter, today);
    let shown_total = sum_cents(shown.iter().map(|e| e.amount_cents));
    let money = state.money();

    let selected_category = match &filter.category {
        CategoryFilter::All => "",
        CategoryFilter::Only(id) => id.as_str(),
    };

    let template = ExpensesTemplate {
        title: "Expenses".into(),
        version: VERSION,
        store_kind: store.kind().as_str(),
        period_key: period.key(),
        period_label: period.label(),
        months: month_options(all_months, period),
        groups: category_groups(""),
        filter_groups: category_groups(selected_category),
        search: filter.search.clone(),
        scope: filter.date_scope.as_param(),
        include_savings: filter.include_savings,
        sort_by: filter.sort_by.as_str(),
        sort_dir: filter.sort_dir.as_str(),
        filter_active: filter.is_active(),
        headers: sort_headers(period, &filter),
        rows: shown.iter().map(|e| ExpenseRow::new(e, &money)).collect(),
        shown_total: money.neutral(shown_total),
        today: today.format(DATE_FORMAT).to_string(),
    };

    template.render_html()
}

pub async fn create(
    State(state): State<AppState>,
    Form(form): Form<ExpenseFormData>,
) -> AppResult<Redirect> {
    debug!(amount = %form.amount, category = %form.category_id, "Creating expense");
    let new_expense = form.to_new_expense()?;
    let expense = state.store.create_expense(&new_expense).await?;
    info!(expense_id = %expense.id, "Expense created via web form");

    Ok(redirect_to_month(&expense.date))
}

pub async fn edit_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Html<String>> {
    let expense = state
        .store
        .get_expense(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Expense {} not found", id)))?;

    let template = ExpenseEditTemplate {
        title: "Edit Expense".into(),
        version: VERSION,
        store_kind: state.store.kind().as_str(),
        id: expense.id.clone(),
        date: expense.date.clone(),
        amount: format_decimal(expense.amount_cents),
        note: expense.note_text().to_string(),
        groups: category_groups(category::get_or_other(&expense.category_id).id),
    };

    template.render_html()
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<ExpenseFormData>,
) -> AppResult<Redirect> {
    debug!(expense_id = %id, "Updating expense");
    let new_expense = form.to_new_expense()?;
    state
        .store
        .update_expense(&id, &ExpensePatch::from(&new_expense))
        .await?;
    info!(expense_id = %id, "Expense updated via web form");

    Ok(redirect_to_month(&new_expense.date))
}

pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> AppResult<Redirect> {
    let expense = state
        .store
        .get_expense(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Expense {} not found", id)))?;

    info!(expense_id = %id, "Deleting expense");
    state.store.delete_expense(&id).await?;

    Ok(redirect_to_month(&expense.date))
}

fn redirect_to_month(date: &str) -> Redirect {
    match date.get(..7) {
        Some(month) => Redirect::to(&format!("/expenses?month={}", month)),
        None => Redirect::to("/expenses"),
    }
}

use askama::Template;
use axum::extract::{Path, Query, State};
use axum::response::{Html, Redirect};
use axum::Form;
use serde::Deserialize;
use tracing::{debug, info};

use crate::date_utils::DATE_FORMAT;
use crate::error::{AppError, AppResult, RenderHtml};
use crate::filters::format_decimal;
use crate::form_utils::{deserialize_optional_trimmed, parse_amount_cents, parse_form_date};
use crate::handlers::{resolve_period, MonthQuery};
use crate::models::{IncomePatch, NewIncome};
use crate::services::carry_over::is_carried_over_income;
use crate::services::summary::summarize_income;
use crate::state::AppState;
use crate::VERSION;

#[derive(Debug, Deserialize)]
pub struct IncomeFormData {
    pub date: String,
    pub amount: String,
    pub source: String,
    #[serde(default, deserialize_with = "deserialize_optional_trimmed")]
    pub note: Option<String>,
}

impl IncomeFormData {
    fn to_new_income(&self) -> AppResult<NewIncome> {
        let source = self.source.trim();
        if source.is_empty() {
            return Err(AppError::Validation("Source is required".into()));
        }
        Ok(NewIncome {
            date: parse_form_date(&self.date)?,
            amount_cents: parse_amount_cents(&self.amount)?,
            source: source.to_string(),
            note: self.note.clone(),
        })
    }
}

pub struct IncomeRow {
    pub id: String,
    pub date: String,
    pub source: String,
    pub note: String,
    pub amount: String,
    pub is_carried_over: bool,
}

#[derive(Template)]
#[template(path = "pages/income.html")]
pub struct IncomeTemplate {
    pub title: String,
    pub version: &'static str,
    pub store_kind: &'static str,
    pub period_key: String,
    pub period_label: String,
    pub prev_key: String,
    pub next_key: String,
    pub total: String,
    pub earned: String,
    pub rows: Vec<IncomeRow>,
    pub today: String,
}

#[derive(Template)]
#[template(path = "pages/income_edit.html")]
pub struct IncomeEditTemplate {
    pub title: String,
    pub version: &'static str,
    pub store_kind: &'static str,
    pub id: String,
    pub date: String,
    pub amount: String,
    pub source: String,
    pub note: String,
}

pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<MonthQuery>,
) -> AppResult<Html<String>> {
    let period = resolve_period(query.month.as_deref(), &state)?;
    debug!(period = %period, "Loading income");

    let entries = state.store.list_income(period).await?;
    let summary = summarize_income(&entries);
    let money = state.money();

    let rows = entries
        .iter()
        .map(|entry| IncomeRow {
            id: entry.id.clone(),
            date: entry.date.clone(),
            source: entry.source.clone(),
            note: entry.note_text().to_string(),
            amount: money.neutral(entry.amount_cents),
            is_carried_over: is_carried_over_income(&entry.source),
        })
        .collect();

    let template = IncomeTemplate {
        title: "Income".into(),
        version: VERSION,
        store_kind: state.store.kind().as_str(),
        period_key: period.key(),
        period_label: period.label(),
        prev_key: period.previous().key(),
        next_key: period.next().key(),
        total: money.neutral(summary.total_cents),
        earned: money.neutral(summary.earned_cents),
        rows,
        today: state.today().format(DATE_FORMAT).to_string(),
    };

    template.render_html()
}

pub async fn create(
    State(state): State<AppState>,
    Form(form): Form<IncomeFormData>,
) -> AppResult<Redirect> {
    debug!(amount = %form.amount, source = %form.source, "Creating income");
    let new_income = form.to_new_income()?;
    let entry = state.store.create_income(&new_income).await?;
    info!(income_id = %entry.id, "Income created via web form");

    Ok(redirect_to_month(&entry.date))
}

pub async fn edit_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Html<String>> {
    let entry = state
        .store
        .get_income(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Income {} not found", id)))?;

    let template = IncomeEditTemplate {
        title: "Edit Income".into(),
        version: VERSION,
        store_kind: state.store.kind().as_str(),
        id: entry.id.clone(),
        date: entry.date.clone(),
        amount: format_decimal(entry.amount_cents),
        source: entry.source.clone(),
        note: entry.note_text().to_string(),
    };

    template.render_html()
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<IncomeFormData>,
) -> AppResult<Redirect> {
    debug!(income_id = %id, "Updating income");
    let new_income = form.to_new_income()?;
    state
        .store
        .update_income(&id, &IncomePatch::from(&new_income))
        .await?;
    info!(income_id = %id, "Income updated via web form");

    Ok(redirect_to_month(&new_income.date))
}

pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> AppResult<Redirect> {
    let entry = state
        .store
        .get_income(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Income {} not found", id)))?;

    info!(income_id = %id, "Deleting income");
    state.store.delete_income(&id).await?;

    Ok(redirect_to_month(&entry.date))
}

fn redirect_to_month(date: &str) -> Redirect {
    match date.get(..7) {
        Some(month) => Redirect::to(&format!("/income?month={}", month)),
        None => Redirect::to("/income"),
    }
}

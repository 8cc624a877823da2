//! Moving a month's unspent balance into the next month.
//!
//! A transfer is an ordinary income record whose source carries a fixed
//! prefix followed by the source month's label. That prefix is the only
//! marker; there is no separate flag in storage.

use serde::Serialize;
use tracing::{debug, info};

use crate::date_utils::Period;
use crate::models::{Expense, Income, NewIncome};
use crate::services::summary::{net_of, summarize_expenses, summarize_income};
use crate::storage::{StoreResult, TransactionStore};

pub const CARRIED_OVER_SOURCE_PREFIX: &str = "Carried over from ";

/// Source label for a transfer out of the month labelled `month_label`.
pub fn carried_over_label(month_label: &str) -> String {
    format!("{}{}", CARRIED_OVER_SOURCE_PREFIX, month_label)
}

pub fn is_carried_over_income(source: &str) -> bool {
    source.starts_with(CARRIED_OVER_SOURCE_PREFIX)
}

/// Income minus real spending minus savings.
pub fn net_cents(income: &[Income], expenses: &[Expense]) -> i64 {
    let income = summarize_income(income);
    let expenses = summarize_expenses(expenses);
    net_of(income.total_cents, expenses.total_cents, expenses.savings_cents)
}

/// The previous month's net when there is something positive to carry.
pub fn previous_net(prev_income: &[Income], prev_expenses: &[Expense]) -> Option<i64> {
    let net = net_cents(prev_income, prev_expenses);
    (net > 0).then_some(net)
}

/// Whether a transfer out of `previous` already sits among `current_income`.
pub fn already_carried_over(current_income: &[Income], previous: Period) -> bool {
    let label = carried_over_label(&previous.label());
    current_income.iter().any(|entry| entry.source == label)
}

/// The income record that carries `amount_cents` into `period`.
pub fn transfer_entry(period: Period, amount_cents: i64) -> NewIncome {
    let from_label = period.previous().label();
    NewIncome {
        date: period.first_day_str(),
        amount_cents,
        source: carried_over_label(&from_label),
        note: Some(format!("Unspent balance from {}", from_label)),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CarryOverStatus {
    pub from_period: Period,
    pub from_label: String,
    pub amount_cents: Option<i64>,
    pub already_carried_over: bool,
}

impl CarryOverStatus {
    pub fn is_pending(&self) -> bool {
        self.amount_cents.is_some() && !self.already_carried_over
    }
}

pub async fn resolve(store: &dyn TransactionStore, period: Period) -> StoreResult<CarryOverStatus> {
    let previous = period.previous();
    let prev_income = store.list_income(previous).await?;
    let prev_expenses = store.list_expenses(previous).await?;
    let current_income = store.list_income(period).await?;

    let status = CarryOverStatus {
        from_period: previous,
        from_label: previous.label(),
        amount_cents: previous_net(&prev_income, &prev_expenses),
        already_carried_over: already_carried_over(&current_income, previous),
    };
    debug!(
        period = %period,
        amount_cents = ?status.amount_cents,
        already = status.already_carried_over,
        "Resolved carry-over"
    );
    Ok(status)
}

/// Record the transfer described by `status`. Does not check whether one
/// already happened; callers look at `status.already_carried_over` first.
pub async fn transfer(
    store: &dyn TransactionStore,
    status: &CarryOverStatus,
    period: Period,
) -> StoreResult<Option<Income>> {
    let Some(amount_cents) = status.amount_cents.filter(|cents| *cents > 0) else {
        return Ok(None);
    };

    let created = store
        .create_income(&transfer_entry(period, amount_cents))
        .await?;
    info!(
        period = %period,
        amount_cents,
        from = %status.from_label,
        "Carried over unspent balance"
    );
    Ok(Some(created))
}

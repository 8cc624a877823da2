//! Monthly aggregation of expenses and income.
//!
//! Everything here is a pure function of its input. Summaries are recomputed
//! whenever the underlying transactions change and are never stored.

use std::collections::{BTreeMap, HashMap};

use crate::models::category;
use crate::models::{
    CategorySummary, DailyTotal, Expense, Income, IncomeSummary, MonthSummary, SourceSummary,
};
use crate::services::carry_over::is_carried_over_income;

/// Percentage of `part` in `whole`, defined as 0 for an empty whole.
pub fn percentage(part: i64, whole: i64) -> f64 {
    if whole > 0 {
        (part as f64 / whole as f64) * 100.0
    } else {
        0.0
    }
}

/// Sum of two amounts, pinned at the `i64` bounds instead of wrapping.
pub fn add_cents(a: i64, b: i64) -> i64 {
    a.saturating_add(b)
}

/// Total of `amounts`, saturating like [`add_cents`].
pub fn sum_cents(amounts: impl IntoIterator<Item = i64>) -> i64 {
    amounts.into_iter().fold(0, add_cents)
}

/// Income left after spending and savings.
pub fn net_of(income_cents: i64, spent_cents: i64, saved_cents: i64) -> i64 {
    income_cents
        .saturating_sub(spent_cents)
        .saturating_sub(saved_cents)
}

pub fn summarize_expenses(expenses: &[Expense]) -> MonthSummary {
    let mut total_cents = 0;
    let mut savings_cents = 0;
    let mut category_data: HashMap<&str, (i64, usize)> = HashMap::new();
    let mut daily_data: BTreeMap<&str, (i64, usize)> = BTreeMap::new();

    for expense in expenses {
        if category::is_savings(&expense.category_id) {
            savings_cents = add_cents(savings_cents, expense.amount_cents);
            continue;
        }

        total_cents = add_cents(total_cents, expense.amount_cents);

        let entry = category_data
            .entry(expense.category_id.as_str())
            .or_insert((0, 0));
        entry.0 = add_cents(entry.0, expense.amount_cents);
        entry.1 += 1;

        let entry = daily_data.entry(expense.date.as_str()).or_insert((0, 0));
        entry.0 = add_cents(entry.0, expense.amount_cents);
        entry.1 += 1;
    }

    let mut by_category: Vec<CategorySummary> = category_data
        .into_iter()
        .filter(|(_, (cents, _))| *cents > 0)
        .map(|(category_id, (cents, count))| CategorySummary {
            category_id: category_id.to_string(),
            total_cents: cents,
            count,
            percentage: percentage(cents, total_cents),
        })
        .collect();

    by_category.sort_by(|a, b| {
        b.total_cents
            .cmp(&a.total_cents)
            .then_with(|| category::position(&a.category_id).cmp(&category::position(&b.category_id)))
            .then_with(|| a.category_id.cmp(&b.category_id))
    });

    MonthSummary {
        total_cents,
        savings_cents,
        by_category,
        daily: into_daily(daily_data),
    }
}

pub fn summarize_income(income: &[Income]) -> IncomeSummary {
    let mut total_cents = 0;
    let mut earned_cents = 0;
    let mut source_data: HashMap<&str, (i64, usize)> = HashMap::new();
    let mut daily_data: BTreeMap<&str, (i64, usize)> = BTreeMap::new();

    for entry in income {
        total_cents = add_cents(total_cents, entry.amount_cents);
        if !is_carried_over_income(&entry.source) {
            earned_cents = add_cents(earned_cents, entry.amount_cents);
        }

        let current = source_data.entry(entry.source.as_str()).or_insert((0, 0));
        current.0 = add_cents(current.0, entry.amount_cents);
        current.1 += 1;

        let current = daily_data.entry(entry.date.as_str()).or_insert((0, 0));
        current.0 = add_cents(current.0, entry.amount_cents);
        current.1 += 1;
    }

    let mut by_source: Vec<SourceSummary> = source_data
        .into_iter()
        .map(|(source, (cents, count))| SourceSummary {
            source: source.to_string(),
            total_cents: cents,
            count,
            percentage: percentage(cents, total_cents),
            is_carried_over: is_carried_over_income(source),
        })
        .collect();

    by_source.sort_by(|a, b| {
        b.total_cents
            .cmp(&a.total_cents)
            .then_with(|| a.source.cmp(&b.source))
    });

    IncomeSummary {
        total_cents,
        earned_cents,
        by_source,
        daily: into_daily(daily_data),
    }
}

/// Savings as a share of earned income. Carried-over balances are not earnings.
pub fn savings_rate(expenses: &MonthSummary, income: &IncomeSummary) -> f64 {
    percentage(expenses.savings_cents, income.earned_cents)
}

fn into_daily(daily_data: BTreeMap<&str, (i64, usize)>) -> Vec<DailyTotal> {
    daily_data
        .into_iter()
        .map(|(date, (total_cents, count))| DailyTotal {
            date: date.to_string(),
            total_cents,
            count,
        })
        .collect()
}

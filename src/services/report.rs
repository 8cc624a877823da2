//! Date-range report with CSV export.

use std::collections::HashMap;
use std::io;

use serde::Serialize;

use crate::filters::format_decimal;
use crate::models::{category, Expense, Income};
use crate::services::summary::{add_cents, net_of, sum_cents, summarize_income};

pub const RECENT_LIMIT: usize = 20;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportLine {
    pub label: String,
    pub total_cents: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EntryKind {
    Income,
    Expense,
}

impl EntryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "Income",
            Self::Expense => "Expense",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportEntry {
    pub date: String,
    pub description: String,
    pub kind: EntryKind,
    pub amount_cents: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub from: String,
    pub to: String,
    pub income_cents: i64,
    pub expense_cents: i64,
    pub savings_cents: i64,
    pub net_cents: i64,
    pub income_by_source: Vec<ReportLine>,
    pub expenses_by_category: Vec<ReportLine>,
    pub recent: Vec<ReportEntry>,
}

impl Report {
    pub fn file_name(&self) -> String {
        format!("expense-report-{}-to-{}.csv", self.from, self.to)
    }
}

pub fn build(from: &str, to: &str, income: &[Income], expenses: &[Expense]) -> Report {
    let (savings, spending): (Vec<&Expense>, Vec<&Expense>) =
        expenses.iter().partition(|e| e.is_savings());

    let income_cents = sum_cents(income.iter().map(|i| i.amount_cents));
    let expense_cents = sum_cents(spending.iter().map(|e| e.amount_cents));
    let savings_cents = sum_cents(savings.iter().map(|e| e.amount_cents));

    let income_by_source = summarize_income(income)
        .by_source
        .into_iter()
        .map(|s| ReportLine {
            label: s.source,
            total_cents: s.total_cents,
        })
        .collect();

    // Unknown ids share the "Other" label, so group by label rather than id.
    let mut by_label: HashMap<&'static str, i64> = HashMap::new();
    for expense in &spending {
        let total = by_label.entry(expense.category().label).or_insert(0);
        *total = add_cents(*total, expense.amount_cents);
    }
    let mut expenses_by_category: Vec<ReportLine> = by_label
        .into_iter()
        .map(|(label, total_cents)| ReportLine {
            label: label.to_string(),
            total_cents,
        })
        .collect();
    expenses_by_category.sort_by(|a, b| {
        b.total_cents
            .cmp(&a.total_cents)
            .then_with(|| a.label.cmp(&b.label))
    });

    let mut recent: Vec<ReportEntry> = income
        .iter()
        .map(|i| ReportEntry {
            date: i.date.clone(),
            description: i.source.clone(),
            kind: EntryKind::Income,
            amount_cents: i.amount_cents,
        })
        .chain(spending.iter().map(|e| ReportEntry {
            date: e.date.clone(),
            description: match e.note.as_deref().map(str::trim) {
                Some(note) if !note.is_empty() => note.to_string(),
                _ => category::get_or_other(&e.category_id).label.to_string(),
            },
            kind: EntryKind::Expense,
            amount_cents: e.amount_cents,
        }))
        .collect();
    recent.sort_by(|a, b| b.date.cmp(&a.date));
    recent.truncate(RECENT_LIMIT);

    Report {
        from: from.to_string(),
        to: to.to_string(),
        income_cents,
        expense_cents,
        savings_cents,
        net_cents: net_of(income_cents, expense_cents, savings_cents),
        income_by_source,
        expenses_by_category,
        recent,
    }
}

/// Render `report` as CSV. Sections are separated by a blank row and
/// empty sections are left out.
pub fn write_csv<W: io::Write>(report: &Report, writer: W) -> csv::Result<()> {
    let mut wtr = csv::WriterBuilder::new().flexible(true).from_writer(writer);

    wtr.write_record(["Expense Report", report.from.as_str(), report.to.as_str()])?;
    wtr.write_record([""])?;

    wtr.write_record(["Summary"])?;
    wtr.write_record(["Metric", "Amount"])?;
    wtr.write_record(["Income", format_decimal(report.income_cents).as_str()])?;
    wtr.write_record(["Total Expenses", format_decimal(report.expense_cents).as_str()])?;
    if report.savings_cents > 0 {
        wtr.write_record(["Savings", format_decimal(report.savings_cents).as_str()])?;
    }
    wtr.write_record(["Net", format_decimal(report.net_cents).as_str()])?;

    if !report.income_by_source.is_empty() {
        wtr.write_record([""])?;
        wtr.write_record(["Income by Source"])?;
        wtr.write_record(["Source", "Amount"])?;
        for line in &report.income_by_source {
            wtr.write_record([line.label.as_str(), format_decimal(line.total_cents).as_str()])?;
        }
    }

    if !report.expenses_by_category.is_empty() {
        wtr.write_record([""])?;
        wtr.write_record(["Expenses by Category"])?;
        wtr.write_record(["Category", "Amount"])?;
        for line in &report.expenses_by_category {
            wtr.write_record([line.label.as_str(), format_decimal(line.total_cents).as_str()])?;
        }
    }

    if !report.recent.is_empty() {
        wtr.write_record([""])?;
        wtr.write_record(["Recent Transactions"])?;
        wtr.write_record(["Date", "Description", "Type", "Amount"])?;
        for entry in &report.recent {
            wtr.write_record([
                entry.date.as_str(),
                entry.description.as_str(),
                entry.kind.as_str(),
                format_decimal(entry.amount_cents).as_str(),
            ])?;
        }
    }

    wtr.flush()?;
    Ok(())
}

//! Filtering and sorting for the expense list.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::Deserialize;

use crate::date_utils::{Period, DATE_FORMAT};
use crate::models::{category, Expense};
use crate::sort_utils::{SortDirection, SortableColumn, TableSort};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(String),
}

impl CategoryFilter {
    pub fn parse(s: &str) -> Self {
        match s.trim() {
            "" | "all" => Self::All,
            id => Self::Only(id.to_string()),
        }
    }

    pub fn as_param(&self) -> &str {
        match self {
            Self::All => "all",
            Self::Only(id) => id,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DateScope {
    Today,
    /// The month picked upstream; adds no restriction of its own.
    Month,
    Specific(Period),
    #[default]
    All,
}

impl DateScope {
    pub fn parse(s: &str) -> Self {
        match s.trim() {
            "today" => Self::Today,
            "month" => Self::Month,
            other => other.parse().map(Self::Specific).unwrap_or(Self::All),
        }
    }

    pub fn as_param(&self) -> String {
        match self {
            Self::Today => "today".into(),
            Self::Month => "month".into(),
            Self::Specific(period) => period.key(),
            Self::All => "all".into(),
        }
    }

    fn matches(&self, date: &str, today: &str) -> bool {
        match self {
            Self::Today => date == today,
            Self::Specific(period) => period.contains(date),
            Self::Month | Self::All => true,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExpenseSortColumn {
    #[default]
    Date,
    Amount,
    Category,
}

impl SortableColumn for ExpenseSortColumn {
    fn from_str(s: &str) -> Option<Self> {
        match s {
            "date" => Some(Self::Date),
            "amount" => Some(Self::Amount),
            "category" => Some(Self::Category),
            _ => None,
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::Amount => "amount",
            Self::Category => "category",
        }
    }
}

/// Raw query parameters of the expense list.
#[derive(Debug, Default, Deserialize)]
pub struct ExpenseFilterParams {
    pub month: Option<String>,
    pub category: Option<String>,
    pub q: Option<String>,
    pub scope: Option<String>,
    pub sort: Option<String>,
    pub dir: Option<String>,
    pub savings: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseFilter {
    pub category: CategoryFilter,
    pub search: String,
    pub date_scope: DateScope,
    pub sort_by: ExpenseSortColumn,
    pub sort_dir: SortDirection,
    pub include_savings: bool,
}

impl Default for ExpenseFilter {
    fn default() -> Self {
        Self {
            category: CategoryFilter::All,
            search: String::new(),
            date_scope: DateScope::All,
            sort_by: ExpenseSortColumn::Date,
            sort_dir: SortDirection::Desc,
            include_savings: true,
        }
    }
}

impl ExpenseFilter {
    pub fn from_params(params: &ExpenseFilterParams) -> Self {
        let defaults = Self::default();
        Self {
            category: params
                .category
                .as_deref()
                .map(CategoryFilter::parse)
                .unwrap_or(defaults.category),
            search: params.q.clone().unwrap_or_default(),
            date_scope: params
                .scope
                .as_deref()
                .map(DateScope::parse)
                .unwrap_or(defaults.date_scope),
            sort_by: params
                .sort
                .as_deref()
                .and_then(ExpenseSortColumn::from_str)
                .unwrap_or(defaults.sort_by),
            sort_dir: params
                .dir
                .as_deref()
                .map(SortDirection::from_str)
                .unwrap_or(defaults.sort_dir),
            include_savings: params
                .savings
                .as_deref()
                .map(|v| !matches!(v, "0" | "false" | "off" | "no"))
                .unwrap_or(defaults.include_savings),
        }
    }

    /// True when anything differs from the defaults.
    pub fn is_active(&self) -> bool {
        self != &Self::default()
    }

    pub fn sort(&self) -> TableSort<ExpenseSortColumn> {
        TableSort {
            column: self.sort_by,
            direction: self.sort_dir,
        }
    }

    /// Non-sort parameters as a query string, for links that change only the sort.
    pub fn filter_query(&self) -> String {
        let mut parts = Vec::new();
        if let CategoryFilter::Only(id) = &self.category {
            parts.push(format!("category={}", urlencoding::encode(id)));
        }
        if !self.search.trim().is_empty() {
            parts.push(format!("q={}", urlencoding::encode(&self.search)));
        }
        if self.date_scope != DateScope::All {
            parts.push(format!("scope={}", self.date_scope.as_param()));
        }
        if !self.include_savings {
            parts.push("savings=0".to_string());
        }
        parts.join("&")
    }
}

/// Filter and sort `expenses`. `today` decides the `Today` scope.
pub fn apply(expenses: &[Expense], filter: &ExpenseFilter, today: NaiveDate) -> Vec<Expense> {
    let today = today.format(DATE_FORMAT).to_string();
    let query = filter.search.trim().to_lowercase();

    let mut result: Vec<Expense> = expenses
        .iter()
        .filter(|e| filter.include_savings || !e.is_savings())
        .filter(|e| filter.date_scope.matches(&e.date, &today))
        .filter(|e| match &filter.category {
            CategoryFilter::All => true,
            CategoryFilter::Only(id) => &e.category_id == id,
        })
        .filter(|e| {
            query.is_empty()
                || e
                    .note
                    .as_deref()
                    .is_some_and(|note| note.to_lowercase().contains(&query))
        })
        .cloned()
        .collect();

    match filter.sort_by {
        ExpenseSortColumn::Date => result.sort_by(|a, b| a.date.cmp(&b.date)),
        ExpenseSortColumn::Amount => result.sort_by_key(|e| e.amount_cents),
        ExpenseSortColumn::Category => result.sort_by_key(|e| e.category().label),
    }
    if filter.sort_dir == SortDirection::Desc {
        result.reverse();
    }

    result
}

/// Distinct months that have expenses, newest first.
pub fn available_months(expenses: &[Expense]) -> Vec<Period> {
    let months: BTreeSet<Period> = expenses
        .iter()
        .filter_map(|e| e.date.get(..7)?.parse().ok())
        .collect();
    months.into_iter().rev().collect()
}

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub category_id: String,
    pub total_cents: i64,
    pub count: usize,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyTotal {
    pub date: String,
    pub total_cents: i64,
    pub count: usize,
}

/// Expense totals for one period. `total_cents` is real spending only;
/// savings-classified expenses are reported separately in `savings_cents`
/// and appear in neither `by_category` nor `daily`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MonthSummary {
    pub total_cents: i64,
    pub savings_cents: i64,
    pub by_category: Vec<CategorySummary>,
    pub daily: Vec<DailyTotal>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceSummary {
    pub source: String,
    pub total_cents: i64,
    pub count: usize,
    pub percentage: f64,
    pub is_carried_over: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IncomeSummary {
    pub total_cents: i64,
    /// Income excluding carried-over balances.
    pub earned_cents: i64,
    pub by_source: Vec<SourceSummary>,
    pub daily: Vec<DailyTotal>,
}

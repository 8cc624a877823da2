use serde::{Deserialize, Serialize};

use crate::models::category;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: String,
    pub date: String,
    pub amount_cents: i64,
    pub category_id: String,
    pub note: Option<String>,
    pub created_at: String,
}

impl Expense {
    pub fn category(&self) -> &'static category::Category {
        category::get_or_other(&self.category_id)
    }

    pub fn is_savings(&self) -> bool {
        category::is_savings(&self.category_id)
    }

    pub fn note_text(&self) -> &str {
        self.note.as_deref().unwrap_or("")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Income {
    pub id: String,
    pub date: String,
    pub amount_cents: i64,
    pub source: String,
    pub note: Option<String>,
    pub created_at: String,
}

impl Income {
    pub fn note_text(&self) -> &str {
        self.note.as_deref().unwrap_or("")
    }
}

/// A validated expense ready to be stored. The store assigns id and timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewExpense {
    pub date: String,
    pub amount_cents: i64,
    pub category_id: String,
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewIncome {
    pub date: String,
    pub amount_cents: i64,
    pub source: String,
    pub note: Option<String>,
}

/// Partial update. `None` leaves the field untouched; `note: Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExpensePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount_cents: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<Option<String>>,
}

impl ExpensePatch {
    pub fn is_empty(&self) -> bool {
        self.date.is_none()
            && self.amount_cents.is_none()
            && self.category_id.is_none()
            && self.note.is_none()
    }
}

impl From<&NewExpense> for ExpensePatch {
    fn from(expense: &NewExpense) -> Self {
        Self {
            date: Some(expense.date.clone()),
            amount_cents: Some(expense.amount_cents),
            category_id: Some(expense.category_id.clone()),
            note: Some(expense.note.clone()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IncomePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount_cents: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<Option<String>>,
}

impl IncomePatch {
    pub fn is_empty(&self) -> bool {
        self.date.is_none()
            && self.amount_cents.is_none()
            && self.source.is_none()
            && self.note.is_none()
    }
}

impl From<&NewIncome> for IncomePatch {
    fn from(income: &NewIncome) -> Self {
        Self {
            date: Some(income.date.clone()),
            amount_cents: Some(income.amount_cents),
            source: Some(income.source.clone()),
            note: Some(income.note.clone()),
        }
    }
}

/// Convert a decimal amount in major units to cents.
pub fn to_cents(amount: f64) -> i64 {
    (amount * 100.0).round() as i64
}

pub fn from_cents(cents: i64) -> f64 {
    cents as f64 / 100.0
}

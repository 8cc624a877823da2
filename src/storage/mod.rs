//! Storage providers.
//!
//! The rest of the application only sees [`TransactionStore`]. Which backend
//! sits behind it is decided once at start-up from configuration and injected
//! through application state.

pub mod local;
pub mod migrate;
pub mod remote;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::date_utils::Period;
use crate::models::{Expense, ExpensePatch, Income, IncomePatch, NewExpense, NewIncome};

pub use local::SqliteStore;
pub use remote::RemoteStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    Local,
    Remote,
}

impl StoreKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Remote => "remote",
        }
    }
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("Remote store error: {0}")]
    Remote(#[from] reqwest::Error),

    #[error("Remote store returned {status}: {body}")]
    RemoteStatus { status: u16, body: String },

    #[error("Background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait TransactionStore: Send + Sync {
    fn kind(&self) -> StoreKind;

    /// Expenses dated between `from` and `to` inclusive (`YYYY-MM-DD`), newest first.
    async fn list_expenses_between(&self, from: &str, to: &str) -> StoreResult<Vec<Expense>>;

    async fn list_expenses(&self, period: Period) -> StoreResult<Vec<Expense>> {
        self.list_expenses_between(&period.first_day_str(), &period.last_day_str())
            .await
    }

    async fn list_all_expenses(&self) -> StoreResult<Vec<Expense>>;

    async fn get_expense(&self, id: &str) -> StoreResult<Option<Expense>>;

    async fn create_expense(&self, expense: &NewExpense) -> StoreResult<Expense>;

    /// Fails with [`StoreError::NotFound`] when no expense has this id.
    async fn update_expense(&self, id: &str, patch: &ExpensePatch) -> StoreResult<()>;

    async fn delete_expense(&self, id: &str) -> StoreResult<()>;

    async fn list_income_between(&self, from: &str, to: &str) -> StoreResult<Vec<Income>>;

    async fn list_income(&self, period: Period) -> StoreResult<Vec<Income>> {
        self.list_income_between(&period.first_day_str(), &period.last_day_str())
            .await
    }

    async fn list_all_income(&self) -> StoreResult<Vec<Income>>;

    async fn get_income(&self, id: &str) -> StoreResult<Option<Income>>;

    async fn create_income(&self, income: &NewIncome) -> StoreResult<Income>;

    async fn update_income(&self, id: &str, patch: &IncomePatch) -> StoreResult<()>;

    async fn delete_income(&self, id: &str) -> StoreResult<()>;

    /// Remove every expense and income record.
    async fn clear_all(&self) -> StoreResult<()>;
}

pub(crate) fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

pub(crate) fn now_timestamp() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
}

//! One-way copy of locally stored records into another store.

use serde::Serialize;
use tracing::{info, warn};

use crate::models::{NewExpense, NewIncome};
use crate::storage::{StoreResult, TransactionStore};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MigrationReport {
    pub transferred: usize,
    pub error: Option<String>,
}

impl MigrationReport {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Copy every expense and income record from `from` into `to`, then clear `from`.
///
/// Stops at the first failed insert; records copied so far stay in `to` and
/// `from` is left untouched.
pub async fn migrate_store(
    from: &dyn TransactionStore,
    to: &dyn TransactionStore,
) -> StoreResult<MigrationReport> {
    let expenses = from.list_all_expenses().await?;
    let income = from.list_all_income().await?;
    info!(
        expenses = expenses.len(),
        income = income.len(),
        from = from.kind().as_str(),
        to = to.kind().as_str(),
        "Starting store migration"
    );

    let mut report = MigrationReport::default();

    for expense in &expenses {
        let new = NewExpense {
            date: expense.date.clone(),
            amount_cents: expense.amount_cents,
            category_id: expense.category_id.clone(),
            note: expense.note.clone(),
        };
        if let Err(e) = to.create_expense(&new).await {
            warn!(expense_id = %expense.id, error = %e, "Migration stopped");
            report.error = Some(e.to_string());
            return Ok(report);
        }
        report.transferred += 1;
    }

    for entry in &income {
        let new = NewIncome {
            date: entry.date.clone(),
            amount_cents: entry.amount_cents,
            source: entry.source.clone(),
            note: entry.note.clone(),
        };
        if let Err(e) = to.create_income(&new).await {
            warn!(income_id = %entry.id, error = %e, "Migration stopped");
            report.error = Some(e.to_string());
            return Ok(report);
        }
        report.transferred += 1;
    }

    from.clear_all().await?;
    info!(transferred = report.transferred, "Store migration complete");
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Expense, ExpensePatch, Income, IncomePatch};
    use crate::storage::{SqliteStore, StoreError, StoreKind};
    use async_trait::async_trait;
    use std::path::Path;

    fn store() -> SqliteStore {
        SqliteStore::open_in_memory(Path::new("migrations")).unwrap()
    }

    fn new_expense(date: &str, cents: i64) -> NewExpense {
        NewExpense {
            date: date.into(),
            amount_cents: cents,
            category_id: "groceries".into(),
            note: None,
        }
    }

    /// A target that accepts expenses but answers every income insert with 503.
    struct IncomeUnavailable {
        inner: SqliteStore,
    }

    #[async_trait]
    impl TransactionStore for IncomeUnavailable {
        fn kind(&self) -> StoreKind {
            StoreKind::Remote
        }

        async fn list_expenses_between(&self, from: &str, to: &str) -> StoreResult<Vec<Expense>> {
            self.inner.list_expenses_between(from, to).await
        }

        async fn list_all_expenses(&self) -> StoreResult<Vec<Expense>> {
            self.inner.list_all_expenses().await
        }

        async fn get_expense(&self, id: &str) -> StoreResult<Option<Expense>> {
            self.inner.get_expense(id).await
        }

        async fn create_expense(&self, expense: &NewExpense) -> StoreResult<Expense> {
            self.inner.create_expense(expense).await
        }

        async fn update_expense(&self, id: &str, patch: &ExpensePatch) -> StoreResult<()> {
            self.inner.update_expense(id, patch).await
        }

        async fn delete_expense(&self, id: &str) -> StoreResult<()> {
            self.inner.delete_expense(id).await
        }

        async fn list_income_between(&self, from: &str, to: &str) -> StoreResult<Vec<Income>> {
            self.inner.list_income_between(from, to).await
        }

        async fn list_all_income(&self) -> StoreResult<Vec<Income>> {
            self.inner.list_all_income().await
        }

        async fn get_income(&self, id: &str) -> StoreResult<Option<Income>> {
            self.inner.get_income(id).await
        }

        async fn create_income(&self, _income: &NewIncome) -> StoreResult<Income> {
            Err(StoreError::RemoteStatus {
                status: 503,
                body: "unavailable".into(),
            })
        }

        async fn update_income(&self, id: &str, patch: &IncomePatch) -> StoreResult<()> {
            self.inner.update_income(id, patch).await
        }

        async fn delete_income(&self, id: &str) -> StoreResult<()> {
            self.inner.delete_income(id).await
        }

        async fn clear_all(&self) -> StoreResult<()> {
            self.inner.clear_all().await
        }
    }

    #[tokio::test]
    async fn test_migrate_stops_at_first_failure_and_keeps_source() {
        let local = store();
        local.create_expense(&new_expense("2026-03-02", 4500)).await.unwrap();
        local.create_expense(&new_expense("2026-03-03", 1200)).await.unwrap();
        local
            .create_income(&NewIncome {
                date: "2026-03-01".into(),
                amount_cents: 300000,
                source: "Salary".into(),
                note: None,
            })
            .await
            .unwrap();
        let target = IncomeUnavailable { inner: store() };

        let report = migrate_store(&local, &target).await.unwrap();
        assert!(!report.is_success());
        assert_eq!(report.transferred, 2);
        assert!(report.error.as_deref().unwrap().contains("503"));

        assert_eq!(local.list_all_expenses().await.unwrap().len(), 2);
        assert_eq!(local.list_all_income().await.unwrap().len(), 1);
        assert_eq!(target.list_all_expenses().await.unwrap().len(), 2);
        assert!(target.list_all_income().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_migrate_copies_and_clears_source() {
        let local = store();
        let target = store();

        local
            .create_expense(&NewExpense {
                date: "2026-03-02".into(),
                amount_cents: 4500,
                category_id: "groceries".into(),
                note: Some("market".into()),
            })
            .await
            .unwrap();
        local
            .create_income(&NewIncome {
                date: "2026-03-01".into(),
                amount_cents: 300000,
                source: "Salary".into(),
                note: None,
            })
            .await
            .unwrap();

        let report = migrate_store(&local, &target).await.unwrap();
        assert!(report.is_success());
        assert_eq!(report.transferred, 2);

        assert!(local.list_all_expenses().await.unwrap().is_empty());
        assert!(local.list_all_income().await.unwrap().is_empty());

        let expenses = target.list_all_expenses().await.unwrap();
        assert_eq!(expenses.len(), 1);
        assert_eq!(expenses[0].note.as_deref(), Some("market"));
        assert_eq!(target.list_all_income().await.unwrap()[0].source, "Salary");
    }

    #[tokio::test]
    async fn test_migrate_empty_store() {
        let report = migrate_store(&store(), &store()).await.unwrap();
        assert_eq!(report, MigrationReport::default());
    }
}

use async_trait::async_trait;
use rusqlite::Connection;
use std::path::Path;

use crate::db::queries::{expenses, income};
use crate::db::{create_in_memory_pool, migrations, DbPool};
use crate::models::{Expense, ExpensePatch, Income, IncomePatch, NewExpense, NewIncome};
use crate::storage::{new_id, now_timestamp, StoreError, StoreKind, StoreResult, TransactionStore};

/// Local store backed by a SQLite connection pool.
#[derive(Clone)]
pub struct SqliteStore {
    pool: DbPool,
}

impl SqliteStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Fresh private in-memory database with the schema applied.
    pub fn open_in_memory(migrations_dir: &Path) -> StoreResult<Self> {
        let pool = create_in_memory_pool()?;
        {
            let conn = pool.get()?;
            migrations::run_migrations(&conn, migrations_dir)?;
        }
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    /// Run blocking SQLite work off the async runtime.
    async fn run<T, F>(&self, f: F) -> StoreResult<T>
    where
        F: FnOnce(&Connection) -> StoreResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            f(&conn)
        })
        .await?
    }
}

#[async_trait]
impl TransactionStore for SqliteStore {
    fn kind(&self) -> StoreKind {
        StoreKind::Local
    }

    async fn list_expenses_between(&self, from: &str, to: &str) -> StoreResult<Vec<Expense>> {
        let (from, to) = (from.to_string(), to.to_string());
        self.run(move |conn| Ok(expenses::list_expenses_between(conn, &from, &to)?))
            .await
    }

    async fn list_all_expenses(&self) -> StoreResult<Vec<Expense>> {
        self.run(|conn| Ok(expenses::list_all_expenses(conn)?)).await
    }

    async fn get_expense(&self, id: &str) -> StoreResult<Option<Expense>> {
        let id = id.to_string();
        self.run(move |conn| Ok(expenses::get_expense(conn, &id)?))
            .await
    }

    async fn create_expense(&self, expense: &NewExpense) -> StoreResult<Expense> {
        let expense = Expense {
            id: new_id(),
            date: expense.date.clone(),
            amount_cents: expense.amount_cents,
            category_id: expense.category_id.clone(),
            note: expense.note.clone(),
            created_at: now_timestamp(),
        };
        self.run(move |conn| {
            expenses::insert_expense(conn, &expense)?;
            Ok(expense)
        })
        .await
    }

    async fn update_expense(&self, id: &str, patch: &ExpensePatch) -> StoreResult<()> {
        let (id, patch) = (id.to_string(), patch.clone());
        self.run(move |conn| {
            if expenses::update_expense(conn, &id, &patch)? {
                Ok(())
            } else {
                Err(StoreError::NotFound(format!("Expense {}", id)))
            }
        })
        .await
    }

    async fn delete_expense(&self, id: &str) -> StoreResult<()> {
        let id = id.to_string();
        self.run(move |conn| {
            if expenses::delete_expense(conn, &id)? {
                Ok(())
            } else {
                Err(StoreError::NotFound(format!("Expense {}", id)))
            }
        })
        .await
    }

    async fn list_income_between(&self, from: &str, to: &str) -> StoreResult<Vec<Income>> {
        let (from, to) = (from.to_string(), to.to_string());
        self.run(move |conn| Ok(income::list_income_between(conn, &from, &to)?))
            .await
    }

    async fn list_all_income(&self) -> StoreResult<Vec<Income>> {
        self.run(|conn| Ok(income::list_all_income(conn)?)).await
    }

    async fn get_income(&self, id: &str) -> StoreResult<Option<Income>> {
        let id = id.to_string();
        self.run(move |conn| Ok(income::get_income(conn, &id)?)).await
    }

    async fn create_income(&self, entry: &NewIncome) -> StoreResult<Income> {
        let entry = Income {
            id: new_id(),
            date: entry.date.clone(),
            amount_cents: entry.amount_cents,
            source: entry.source.clone(),
            note: entry.note.clone(),
            created_at: now_timestamp(),
        };
        self.run(move |conn| {
            income::insert_income(conn, &entry)?;
            Ok(entry)
        })
        .await
    }

    async fn update_income(&self, id: &str, patch: &IncomePatch) -> StoreResult<()> {
        let (id, patch) = (id.to_string(), patch.clone());
        self.run(move |conn| {
            if income::update_income(conn, &id, &patch)? {
                Ok(())
            } else {
                Err(StoreError::NotFound(format!("Income {}", id)))
            }
        })
        .await
    }

    async fn delete_income(&self, id: &str) -> StoreResult<()> {
        let id = id.to_string();
        self.run(move |conn| {
            if income::delete_income(conn, &id)? {
                Ok(())
            } else {
                Err(StoreError::NotFound(format!("Income {}", id)))
            }
        })
        .await
    }

    async fn clear_all(&self) -> StoreResult<()> {
        self.run(|conn| {
            let tx = conn.unchecked_transaction()?;
            expenses::delete_all_expenses(&tx)?;
            income::delete_all_income(&tx)?;
            tx.commit()?;
            Ok(())
        })
        .await
    }
}

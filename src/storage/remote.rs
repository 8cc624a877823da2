//! Remote multi-device store speaking a PostgREST-style HTTP API.
//!
//! Tables `expenses` and `income` mirror the local schema. Rows are filtered
//! with PostgREST operators (`date=gte.2026-03-01`, `id=eq.<uuid>`).

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info};

use crate::config::RemoteConfig;
use crate::models::{Expense, ExpensePatch, Income, IncomePatch, NewExpense, NewIncome};
use crate::storage::{new_id, now_timestamp, StoreError, StoreKind, StoreResult, TransactionStore};

const EXPENSES: &str = "expenses";
const INCOME: &str = "income";
const ORDER_NEWEST: &str = "date.desc,created_at.desc";

#[derive(Clone)]
pub struct RemoteStore {
    client: Client,
    base_url: String,
    api_key: String,
}

impl RemoteStore {
    pub fn new(config: &RemoteConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        }
    }

    pub fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn request(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    async fn check(response: Response) -> StoreResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(StoreError::RemoteStatus {
            status: status.as_u16(),
            body,
        })
    }

    async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        filters: &[(&str, String)],
    ) -> StoreResult<Vec<T>> {
        let mut query: Vec<(&str, String)> = vec![("select", "*".to_string())];
        query.extend(filters.iter().cloned());

        let response = self
            .request(self.client.get(self.table_url(table)))
            .query(&query)
            .send()
            .await?;
        let rows: Vec<T> = Self::check(response).await?.json().await?;
        debug!(table, count = rows.len(), "Fetched remote rows");
        Ok(rows)
    }

    async fn insert<T: Serialize + Sync>(&self, table: &str, row: &T) -> StoreResult<()> {
        let response = self
            .request(self.client.post(self.table_url(table)))
            .header("Prefer", "return=minimal")
            .json(row)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    /// PATCH/DELETE by id, asking for the affected rows back to detect misses.
    async fn affected_by_id(&self, builder: RequestBuilder, id: &str) -> StoreResult<usize> {
        let response = self
            .request(builder)
            .query(&[("id", format!("eq.{}", id))])
            .header("Prefer", "return=representation")
            .send()
            .await?;
        let rows: Vec<serde_json::Value> = Self::check(response).await?.json().await?;
        Ok(rows.len())
    }

    async fn update<P: Serialize + Sync>(&self, table: &str, id: &str, patch: &P, what: &str) -> StoreResult<()> {
        let builder = self.client.patch(self.table_url(table)).json(patch);
        match self.affected_by_id(builder, id).await? {
            0 => Err(StoreError::NotFound(format!("{} {}", what, id))),
            _ => Ok(()),
        }
    }

    async fn delete(&self, table: &str, id: &str, what: &str) -> StoreResult<()> {
        let builder = self.client.delete(self.table_url(table));
        match self.affected_by_id(builder, id).await? {
            0 => Err(StoreError::NotFound(format!("{} {}", what, id))),
            _ => Ok(()),
        }
    }

    async fn delete_every(&self, table: &str) -> StoreResult<()> {
        // PostgREST refuses unfiltered deletes; every id is non-null.
        let response = self
            .request(self.client.delete(self.table_url(table)))
            .query(&[("id", "not.is.null")])
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }
}

pub(crate) fn range_filters(from: &str, to: &str) -> Vec<(&'static str, String)> {
    vec![
        ("date", format!("gte.{}", from)),
        ("date", format!("lte.{}", to)),
        ("order", ORDER_NEWEST.to_string()),
    ]
}

pub(crate) fn id_filter(id: &str) -> Vec<(&'static str, String)> {
    vec![("id", format!("eq.{}", id))]
}

#[async_trait]
impl TransactionStore for RemoteStore {
    fn kind(&self) -> StoreKind {
        StoreKind::Remote
    }

    async fn list_expenses_between(&self, from: &str, to: &str) -> StoreResult<Vec<Expense>> {
        self.select(EXPENSES, &range_filters(from, to)).await
    }

    async fn list_all_expenses(&self) -> StoreResult<Vec<Expense>> {
        self.select(EXPENSES, &[("order", ORDER_NEWEST.to_string())])
            .await
    }

    async fn get_expense(&self, id: &str) -> StoreResult<Option<Expense>> {
        let rows: Vec<Expense> = self.select(EXPENSES, &id_filter(id)).await?;
        Ok(rows.into_iter().next())
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
        self.insert(EXPENSES, &expense).await?;
        info!(expense_id = %expense.id, "Created remote expense");
        Ok(expense)
    }

    async fn update_expense(&self, id: &str, patch: &ExpensePatch) -> StoreResult<()> {
        if patch.is_empty() {
            return match self.get_expense(id).await? {
                Some(_) => Ok(()),
                None => Err(StoreError::NotFound(format!("Expense {}", id))),
            };
        }
        self.update(EXPENSES, id, patch, "Expense").await
    }

    async fn delete_expense(&self, id: &str) -> StoreResult<()> {
        self.delete(EXPENSES, id, "Expense").await
    }

    async fn list_income_between(&self, from: &str, to: &str) -> StoreResult<Vec<Income>> {
        self.select(INCOME, &range_filters(from, to)).await
    }

    async fn list_all_income(&self) -> StoreResult<Vec<Income>> {
        self.select(INCOME, &[("order", ORDER_NEWEST.to_string())])
            .await
    }

    async fn get_income(&self, id: &str) -> StoreResult<Option<Income>> {
        let rows: Vec<Income> = self.select(INCOME, &id_filter(id)).await?;
        Ok(rows.into_iter().next())
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
        self.insert(INCOME, &entry).await?;
        info!(income_id = %entry.id, "Created remote income");
        Ok(entry)
    }

    async fn update_income(&self, id: &str, patch: &IncomePatch) -> StoreResult<()> {
        if patch.is_empty() {
            return match self.get_income(id).await? {
                Some(_) => Ok(()),
                None => Err(StoreError::NotFound(format!("Income {}", id))),
            };
        }
        self.update(INCOME, id, patch, "Income").await
    }

    async fn delete_income(&self, id: &str) -> StoreResult<()> {
        self.delete(INCOME, id, "Income").await
    }

    async fn clear_all(&self) -> StoreResult<()> {
        self.delete_every(EXPENSES).await?;
        self.delete_every(INCOME).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(url: &str) -> RemoteStore {
        RemoteStore::new(&RemoteConfig {
            url: url.into(),
            api_key: "anon-key".into(),
        })
    }

    #[test]
    fn test_table_url_trims_trailing_slash() {
        assert_eq!(
            store("https://db.example.com/").table_url("expenses"),
            "https://db.example.com/rest/v1/expenses"
        );
    }

    #[test]
    fn test_range_filters() {
        let filters = range_filters("2026-03-01", "2026-03-31");
        assert_eq!(filters[0], ("date", "gte.2026-03-01".to_string()));
        assert_eq!(filters[1], ("date", "lte.2026-03-31".to_string()));
        assert_eq!(filters[2].0, "order");
    }

    #[test]
    fn test_id_filter() {
        assert_eq!(id_filter("abc"), vec![("id", "eq.abc".to_string())]);
    }

    #[test]
    fn test_patch_serializes_only_present_fields() {
        let patch = ExpensePatch {
            amount_cents: Some(1250),
            note: Some(None),
            ..Default::default()
        };
        let json = serde_json::to_value(&patch).unwrap();
        assert_eq!(json, serde_json::json!({ "amount_cents": 1250, "note": null }));
    }
}

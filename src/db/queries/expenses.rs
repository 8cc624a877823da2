use rusqlite::{params, Connection, OptionalExtension, Row, ToSql};
use tracing::{debug, trace};

use crate::models::{Expense, ExpensePatch};

const SELECT_EXPENSE: &str =
    "SELECT id, date, amount_cents, category_id, note, created_at FROM expenses";

fn map_row(row: &Row<'_>) -> rusqlite::Result<Expense> {
    Ok(Expense {
        id: row.get(0)?,
        date: row.get(1)?,
        amount_cents: row.get(2)?,
        category_id: row.get(3)?,
        note: row.get(4)?,
        created_at: row.get(5)?,
    })
}

/// Expenses dated within `[from, to]`, newest first.
pub fn list_expenses_between(
    conn: &Connection,
    from: &str,
    to: &str,
) -> rusqlite::Result<Vec<Expense>> {
    let sql = format!(
        "{SELECT_EXPENSE} WHERE date >= ? AND date <= ? ORDER BY date DESC, created_at DESC"
    );
    let mut stmt = conn.prepare(&sql)?;
    let expenses = stmt
        .query_map(params![from, to], map_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    debug!(count = expenses.len(), from, to, "Listed expenses");
    Ok(expenses)
}

pub fn list_all_expenses(conn: &Connection) -> rusqlite::Result<Vec<Expense>> {
    let sql = format!("{SELECT_EXPENSE} ORDER BY date DESC, created_at DESC");
    let mut stmt = conn.prepare(&sql)?;
    let expenses = stmt
        .query_map([], map_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    debug!(count = expenses.len(), "Listed all expenses");
    Ok(expenses)
}

pub fn get_expense(conn: &Connection, id: &str) -> rusqlite::Result<Option<Expense>> {
    trace!(expense_id = id, "Fetching expense");
    let sql = format!("{SELECT_EXPENSE} WHERE id = ?");
    conn.query_row(&sql, [id], map_row).optional()
}

pub fn insert_expense(conn: &Connection, expense: &Expense) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO expenses (id, date, amount_cents, category_id, note, created_at)
         VALUES (?, ?, ?, ?, ?, ?)",
        params![
            expense.id,
            expense.date,
            expense.amount_cents,
            expense.category_id,
            expense.note,
            expense.created_at,
        ],
    )?;

    debug!(
        expense_id = %expense.id,
        amount_cents = expense.amount_cents,
        "Created expense"
    );
    Ok(())
}

/// Apply the fields present in `patch`. Returns false when no row has this id.
pub fn update_expense(conn: &Connection, id: &str, patch: &ExpensePatch) -> rusqlite::Result<bool> {
    let mut sets: Vec<&str> = Vec::new();
    let mut params_vec: Vec<Box<dyn ToSql>> = Vec::new();

    if let Some(ref date) = patch.date {
        sets.push("date = ?");
        params_vec.push(Box::new(date.clone()));
    }
    if let Some(amount_cents) = patch.amount_cents {
        sets.push("amount_cents = ?");
        params_vec.push(Box::new(amount_cents));
    }
    if let Some(ref category_id) = patch.category_id {
        sets.push("category_id = ?");
        params_vec.push(Box::new(category_id.clone()));
    }
    if let Some(ref note) = patch.note {
        sets.push("note = ?");
        params_vec.push(Box::new(note.clone()));
    }

    if sets.is_empty() {
        return Ok(get_expense(conn, id)?.is_some());
    }

    let sql = format!("UPDATE expenses SET {} WHERE id = ?", sets.join(", "));
    params_vec.push(Box::new(id.to_string()));

    let params_refs: Vec<&dyn ToSql> = params_vec.iter().map(|p| p.as_ref()).collect();
    let rows = conn.execute(&sql, params_refs.as_slice())?;
    if rows > 0 {
        debug!(expense_id = id, "Updated expense");
    }
    Ok(rows > 0)
}

pub fn delete_expense(conn: &Connection, id: &str) -> rusqlite::Result<bool> {
    let rows = conn.execute("DELETE FROM expenses WHERE id = ?", [id])?;
    if rows > 0 {
        debug!(expense_id = id, "Deleted expense");
    }
    Ok(rows > 0)
}

pub fn delete_all_expenses(conn: &Connection) -> rusqlite::Result<usize> {
    let rows = conn.execute("DELETE FROM expenses", [])?;
    tracing::warn!(count = rows, "Deleted all expenses");
    Ok(rows)
}

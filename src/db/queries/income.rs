use rusqlite::{params, Connection, OptionalExtension, Row, ToSql};
use tracing::{debug, trace};

use crate::models::{Income, IncomePatch};

const SELECT_INCOME: &str = "SELECT id, date, amount_cents, source, note, created_at FROM income";

fn map_row(row: &Row<'_>) -> rusqlite::Result<Income> {
    Ok(Income {
        id: row.get(0)?,
        date: row.get(1)?,
        amount_cents: row.get(2)?,
        source: row.get(3)?,
        note: row.get(4)?,
        created_at: row.get(5)?,
    })
}

pub fn list_income_between(conn: &Connection, from: &str, to: &str) -> rusqlite::Result<Vec<Income>> {
    let sql = format!(
        "{SELECT_INCOME} WHERE date >= ? AND date <= ? ORDER BY date DESC, created_at DESC"
    );
    let mut stmt = conn.prepare(&sql)?;
    let income = stmt
        .query_map(params![from, to], map_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    debug!(count = income.len(), from, to, "Listed income");
    Ok(income)
}

pub fn list_all_income(conn: &Connection) -> rusqlite::Result<Vec<Income>> {
    let sql = format!("{SELECT_INCOME} ORDER BY date DESC, created_at DESC");
    let mut stmt = conn.prepare(&sql)?;
    let income = stmt
        .query_map([], map_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(income)
}

pub fn get_income(conn: &Connection, id: &str) -> rusqlite::Result<Option<Income>> {
    trace!(income_id = id, "Fetching income");
    let sql = format!("{SELECT_INCOME} WHERE id = ?");
    conn.query_row(&sql, [id], map_row).optional()
}

pub fn insert_income(conn: &Connection, income: &Income) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO income (id, date, amount_cents, source, note, created_at)
         VALUES (?, ?, ?, ?, ?, ?)",
        params![
            income.id,
            income.date,
            income.amount_cents,
            income.source,
            income.note,
            income.created_at,
        ],
    )?;

    debug!(income_id = %income.id, source = %income.source, "Created income");
    Ok(())
}

pub fn update_income(conn: &Connection, id: &str, patch: &IncomePatch) -> rusqlite::Result<bool> {
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
    if let Some(ref source) = patch.source {
        sets.push("source = ?");
        params_vec.push(Box::new(source.clone()));
    }
    if let Some(ref note) = patch.note {
        sets.push("note = ?");
        params_vec.push(Box::new(note.clone()));
    }

    if sets.is_empty() {
        return Ok(get_income(conn, id)?.is_some());
    }

    let sql = format!("UPDATE income SET {} WHERE id = ?", sets.join(", "));
    params_vec.push(Box::new(id.to_string()));

    let params_refs: Vec<&dyn ToSql> = params_vec.iter().map(|p| p.as_ref()).collect();
    let rows = conn.execute(&sql, params_refs.as_slice())?;
    if rows > 0 {
        debug!(income_id = id, "Updated income");
    }
    Ok(rows > 0)
}

pub fn delete_income(conn: &Connection, id: &str) -> rusqlite::Result<bool> {
    let rows = conn.execute("DELETE FROM income WHERE id = ?", [id])?;
    if rows > 0 {
        debug!(income_id = id, "Deleted income");
    }
    Ok(rows > 0)
}

pub fn delete_all_income(conn: &Connection) -> rusqlite::Result<usize> {
    let rows = conn.execute("DELETE FROM income", [])?;
    tracing::warn!(count = rows, "Deleted all income");
    Ok(rows)
}

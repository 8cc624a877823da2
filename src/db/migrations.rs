use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use rusqlite::Connection;

/// `*.sql` files in `dir`, sorted by file name. A missing directory yields none.
fn migration_files(dir: &Path) -> Vec<(String, PathBuf)> {
    let mut files: Vec<(String, PathBuf)> = fs::read_dir(dir)
        .map(|entries| {
            entries
                .filter_map(Result::ok)
                .map(|entry| entry.path())
                .filter(|path| path.extension().is_some_and(|ext| ext == "sql"))
                .filter_map(|path| {
                    let name = path.file_name()?.to_string_lossy().into_owned();
                    Some((name, path))
                })
                .collect()
        })
        .unwrap_or_default();
    files.sort_by(|a, b| a.0.cmp(&b.0));
    files
}

fn applied_names(conn: &Connection) -> rusqlite::Result<HashSet<String>> {
    let mut stmt = conn.prepare("SELECT name FROM schema_migrations")?;
    let names = stmt.query_map([], |row| row.get(0))?;
    names.collect()
}

/// Bring the schema up to date with the files in `migrations_dir`.
/// Each file runs once, inside its own transaction. Returns how many ran.
pub fn run_migrations(conn: &Connection, migrations_dir: &Path) -> rusqlite::Result<usize> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            name TEXT PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
    )?;

    let files = migration_files(migrations_dir);
    if files.is_empty() {
        tracing::warn!(dir = %migrations_dir.display(), "No migration files found");
    }

    let applied = applied_names(conn)?;
    let mut count = 0;
    for (name, path) in files.into_iter().filter(|(name, _)| !applied.contains(name)) {
        let sql = fs::read_to_string(&path)
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;

        tracing::info!(migration = %name, "Applying migration");
        let tx = conn.unchecked_transaction()?;
        tx.execute_batch(&sql)?;
        tx.execute("INSERT INTO schema_migrations (name) VALUES (?1)", [&name])?;
        tx.commit()?;
        count += 1;
    }

    tracing::debug!(applied = count, "Schema up to date");
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_migrations_apply_once() {
        let conn = Connection::open_in_memory().unwrap();
        let dir = Path::new("migrations");

        assert!(run_migrations(&conn, dir).unwrap() >= 1);
        assert_eq!(run_migrations(&conn, dir).unwrap(), 0);

        let tables: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name IN ('expenses', 'income')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(tables, 2);
    }

    #[test]
    fn test_files_run_in_name_order() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("002_b.sql"), "INSERT INTO t (v) VALUES ('second');").unwrap();
        fs::write(dir.path().join("001_a.sql"), "CREATE TABLE t (v TEXT);").unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let conn = Connection::open_in_memory().unwrap();
        assert_eq!(run_migrations(&conn, dir.path()).unwrap(), 2);

        let value: String = conn.query_row("SELECT v FROM t", [], |row| row.get(0)).unwrap();
        assert_eq!(value, "second");
    }

    #[test]
    fn test_missing_directory_applies_nothing() {
        let conn = Connection::open_in_memory().unwrap();
        assert_eq!(run_migrations(&conn, Path::new("no-such-dir")).unwrap(), 0);
    }
}

use crate::ui::messages::warning;
use rusqlite::{Connection, OptionalExtension, Result};

/// Ensure that the `log` table exists with the current schema.
fn ensure_log_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

fn log_table_exists(conn: &Connection) -> Result<bool> {
    let mut stmt =
        conn.prepare("SELECT name FROM sqlite_master WHERE type='table' AND name='log'")?;
    let exists: Option<String> = stmt.query_row([], |row| row.get(0)).optional()?;
    Ok(exists.is_some())
}

/// Check if the `log` table has the given column.
fn log_has_column(conn: &Connection, column: &str) -> Result<bool> {
    let mut stmt = conn.prepare("PRAGMA table_info('log')")?;
    let cols = stmt.query_map([], |row| row.get::<_, String>(1))?;

    for c in cols {
        if c? == column {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Journals written before `target` existed only had (date, operation, message).
fn migrate_add_target_column(conn: &Connection) -> Result<()> {
    if log_has_column(conn, "target")? {
        return Ok(());
    }

    warning("Adding 'target' column to log table...");
    conn.execute_batch("ALTER TABLE log ADD COLUMN target TEXT DEFAULT '';")?;
    Ok(())
}

pub fn run_pending_migrations(conn: &Connection) -> Result<()> {
    if log_table_exists(conn)? {
        migrate_add_target_column(conn)?;
    } else {
        ensure_log_table(conn)?;
    }

    conn.execute_batch("CREATE INDEX IF NOT EXISTS idx_log_date ON log(date);")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_database_gets_log_table() {
        let conn = Connection::open_in_memory().unwrap();
        run_pending_migrations(&conn).unwrap();
        assert!(log_table_exists(&conn).unwrap());
        assert!(log_has_column(&conn, "target").unwrap());
    }

    #[test]
    fn old_log_table_gains_target_column() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE log (id INTEGER PRIMARY KEY AUTOINCREMENT, date TEXT NOT NULL,
                               operation TEXT NOT NULL, message TEXT NOT NULL);
             INSERT INTO log (date, operation, message) VALUES ('2024-01-01T00:00:00+00:00', 'motion', 'x');",
        )
        .unwrap();

        run_pending_migrations(&conn).unwrap();

        assert!(log_has_column(&conn, "target").unwrap());
        let target: String = conn
            .query_row("SELECT target FROM log WHERE id = 1", [], |r| r.get(0))
            .unwrap();
        assert_eq!(target, "");
    }

    #[test]
    fn migrations_are_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        run_pending_migrations(&conn).unwrap();
        run_pending_migrations(&conn).unwrap();
    }
}

//! Local journal of what the sensor loops did (`log` table).

use crate::db::migrate::run_pending_migrations;
use crate::db::models::JournalEntry;
use crate::errors::AppResult;
use chrono::Local;
use rusqlite::{Connection, params};
use std::path::Path;

pub struct Journal {
    conn: Connection,
}

impl Journal {
    /// Open (or create) the journal and bring its schema up to date.
    pub fn open(path: &Path) -> AppResult<Self> {
        if let Some(dir) = path.parent()
            && !dir.as_os_str().is_empty()
        {
            std::fs::create_dir_all(dir)?;
        }
        let conn = Connection::open(path)?;
        run_pending_migrations(&conn)?;
        Ok(Self { conn })
    }

    pub fn in_memory() -> AppResult<Self> {
        let conn = Connection::open_in_memory()?;
        run_pending_migrations(&conn)?;
        Ok(Self { conn })
    }

    /// Write one journal line timestamped now.
    pub fn record(&self, operation: &str, target: &str, message: &str) -> AppResult<()> {
        let now = Local::now().to_rfc3339();

        let mut stmt = self.conn.prepare_cached(
            "INSERT INTO log (date, operation, target, message)
             VALUES (?1, ?2, ?3, ?4)",
        )?;
        stmt.execute(params![now, operation, target, message])?;

        Ok(())
    }

    /// Like `record`, but a failing journal only produces a warning.
    pub fn note(&self, operation: &str, target: &str, message: &str) {
        if let Err(e) = self.record(operation, target, message) {
            log::warn!("failed to write journal entry '{}': {}", operation, e);
        }
    }

    /// All entries, oldest first. `limit` keeps only the most recent ones.
    pub fn entries(&self, limit: Option<usize>) -> AppResult<Vec<JournalEntry>> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT id, date, operation, IFNULL(target, ''), message FROM log ORDER BY id ASC",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(JournalEntry {
                id: row.get(0)?,
                date: row.get(1)?,
                operation: row.get(2)?,
                target: row.get(3)?,
                message: row.get(4)?,
            })
        })?;

        let mut entries = Vec::new();
        for r in rows {
            entries.push(r?);
        }

        if let Some(n) = limit
            && entries.len() > n
        {
            entries.drain(..entries.len() - n);
        }
        Ok(entries)
    }
}

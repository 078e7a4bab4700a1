//! SQLite ledger adapter.
//!
//! The store is a database file and each tab a table. Column names become the
//! header and every value is read back as text, in insertion (rowid) order.

use crate::domain::error::DigestError;
use crate::domain::ledger::{Header, LedgerRow, LedgerSnapshot};
use crate::ports::row_source::RowSource;
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::OpenFlags;
use rusqlite::types::ValueRef;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

pub struct SqliteLedgerAdapter {
    pool: Pool<SqliteConnectionManager>,
    table: String,
}

impl SqliteLedgerAdapter {
    /// Opens an existing database read-only. A missing file is a ledger error,
    /// never a fresh empty database.
    pub fn open(path: &Path, table: &str) -> Result<Self, DigestError> {
        validate_table_name(table)?;
        if !path.is_file() {
            return Err(DigestError::ledger(format!(
                "no ledger database at {}",
                path.display()
            )));
        }

        let manager = SqliteConnectionManager::file(path)
            .with_flags(OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX);
        Self::with_manager(manager, table)
    }

    #[cfg(test)]
    fn in_memory(table: &str) -> Result<Self, DigestError> {
        validate_table_name(table)?;
        Self::with_manager(SqliteConnectionManager::memory(), table)
    }

    fn with_manager(manager: SqliteConnectionManager, table: &str) -> Result<Self, DigestError> {
        let pool = Pool::builder()
            .max_size(1)
            .connection_timeout(CONNECT_TIMEOUT)
            .build(manager)
            .map_err(|e: r2d2::Error| DigestError::ledger(e.to_string()))?;

        Ok(Self {
            pool,
            table: table.to_string(),
        })
    }

    fn connection(&self) -> Result<r2d2::PooledConnection<SqliteConnectionManager>, DigestError> {
        self.pool
            .get()
            .map_err(|e: r2d2::Error| DigestError::ledger(e.to_string()))
    }
}

impl RowSource for SqliteLedgerAdapter {
    fn fetch_all(&self) -> Result<LedgerSnapshot, DigestError> {
        let conn = self.connection()?;
        let query = format!("SELECT * FROM {} ORDER BY rowid", quote_identifier(&self.table));

        let mut stmt = conn
            .prepare(&query)
            .map_err(|e: rusqlite::Error| DigestError::ledger(e.to_string()))?;
        let header: Header = stmt.column_names().into_iter().collect();
        let width = header.len();

        let rows = stmt
            .query_map([], |row| {
                let mut cells = Vec::with_capacity(width);
                for i in 0..width {
                    cells.push(cell_text(row.get_ref(i)?));
                }
                Ok(cells)
            })
            .map_err(|e: rusqlite::Error| DigestError::ledger(e.to_string()))?;

        let mut ledger_rows = Vec::new();
        for row in rows {
            let mut cells = row.map_err(|e: rusqlite::Error| DigestError::ledger(e.to_string()))?;
            while matches!(cells.last(), Some(None)) {
                cells.pop();
            }
            ledger_rows.push(LedgerRow::new(
                cells.into_iter().map(Option::unwrap_or_default).collect(),
            ));
        }

        debug!(table = %self.table, rows = ledger_rows.len(), "read ledger table");
        Ok(LedgerSnapshot::new(header, ledger_rows))
    }

    fn describe(&self) -> String {
        format!("sqlite table {}", self.table)
    }
}

fn cell_text(value: ValueRef<'_>) -> Option<String> {
    match value {
        ValueRef::Null => None,
        ValueRef::Integer(i) => Some(i.to_string()),
        ValueRef::Real(f) => Some(f.to_string()),
        ValueRef::Text(b) | ValueRef::Blob(b) => Some(String::from_utf8_lossy(b).into_owned()),
    }
}

fn validate_table_name(name: &str) -> Result<(), DigestError> {
    let valid = !name.trim().is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == ' ');
    if valid {
        Ok(())
    } else {
        Err(DigestError::invalid(
            "ledger",
            "tab",
            format!("{name:?} is not a valid table name"),
        ))
    }
}

fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

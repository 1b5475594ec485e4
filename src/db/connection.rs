use std::path::Path;
use std::time::Duration;

use rusqlite::{Connection, OpenFlags};

use crate::errors::{LookupError, Result};

/// Tables of the Mendeley schema that the lookup queries join over.
pub const REQUIRED_TABLES: [&str; 4] = ["Documents", "DocumentContributors", "DocumentFiles", "Files"];

/// How long a read waits on a lock held by a running Mendeley Desktop.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Read-only handle on a Mendeley Desktop SQLite database.
///
/// The connection is released when the handle is dropped.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Opens the database at `db_path` without write access.
    ///
    /// The file is never created. Fails with [`LookupError::Connection`] if
    /// the file is missing, is not an SQLite database, or lacks one of the
    /// [`REQUIRED_TABLES`].
    pub fn open_read_only(db_path: &Path) -> Result<Self> {
        let conn = Connection::open_with_flags(
            db_path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|e| connection_error(db_path, format!("failed to open database: {e}")))?;

        Self::apply_pragmas(&conn)
            .map_err(|e| connection_error(db_path, format!("failed to apply pragmas: {e}")))?;
        Self::check_schema(&conn, db_path)?;

        tracing::debug!(path = %db_path.display(), "opened Mendeley database");
        Ok(Self { conn })
    }

    /// Returns a reference to the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Consumes the `Database`, closing the underlying connection.
    pub fn close(self) {
        drop(self.conn);
    }

    /// Rejects any statement that would write, on top of the read-only open flag.
    fn apply_pragmas(conn: &Connection) -> rusqlite::Result<()> {
        conn.busy_timeout(BUSY_TIMEOUT)?;
        conn.execute_batch("PRAGMA query_only = ON;")
    }

    /// Verifies that the file is a database with the Mendeley tables we query.
    ///
    /// SQLite opens arbitrary files lazily, so reading `sqlite_master` is also
    /// where a non-database file is first detected.
    fn check_schema(conn: &Connection, db_path: &Path) -> Result<()> {
        let tables: Vec<String> = conn
            .prepare("SELECT name FROM sqlite_master WHERE type = 'table'")
            .and_then(|mut stmt| {
                let names = stmt
                    .query_map([], |row| row.get::<_, String>(0))?
                    .collect::<rusqlite::Result<Vec<_>>>();
                names
            })
            .map_err(|e| connection_error(db_path, format!("failed to read schema: {e}")))?;

        for required in REQUIRED_TABLES {
            if !tables.iter().any(|t| t == required) {
                return Err(connection_error(
                    db_path,
                    format!("not a Mendeley database: missing table '{required}'"),
                ));
            }
        }
        Ok(())
    }
}

fn connection_error(db_path: &Path, message: String) -> LookupError {
    LookupError::Connection {
        message,
        path: db_path.display().to_string(),
    }
}

use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use rusqlite::{params, Connection, OptionalExtension};
use serde_json::Value;

use super::{RemoteError, RemoteStore};
use crate::db::configure_for_speed;
use crate::domain::dates::now_utc_rfc3339;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS shared_document (
    id TEXT PRIMARY KEY,
    data TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
"#;

/// Remote row kept in a SQLite file that several devices can reach, e.g. on
/// a synced or network-mounted folder.
pub struct SqliteRemote {
    conn: Mutex<Connection>,
    path: PathBuf,
    record_id: String,
}

impl SqliteRemote {
    pub fn open(path: &Path, record_id: &str) -> Result<Self, RemoteError> {
        let conn = Connection::open(path)?;
        configure_for_speed(&conn)?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
            path: path.to_path_buf(),
            record_id: record_id.to_string(),
        })
    }
}

impl RemoteStore for SqliteRemote {
    fn read(&self) -> Result<Option<Value>, RemoteError> {
        let conn = self.conn.lock().unwrap_or_else(PoisonError::into_inner);
        let data: Option<String> = conn
            .query_row(
                "SELECT data FROM shared_document WHERE id = ?1",
                params![self.record_id],
                |row| row.get(0),
            )
            .optional()?;
        match data {
            Some(text) => Ok(Some(serde_json::from_str(&text)?)),
            None => Ok(None),
        }
    }

    fn write(&self, document: &Value) -> Result<(), RemoteError> {
        let conn = self.conn.lock().unwrap_or_else(PoisonError::into_inner);
        conn.execute(
            r#"
INSERT INTO shared_document (id, data, updated_at)
VALUES (?1, ?2, ?3)
ON CONFLICT(id) DO UPDATE SET
    data = excluded.data,
    updated_at = excluded.updated_at
"#,
            params![self.record_id, document.to_string(), now_utc_rfc3339()],
        )?;
        Ok(())
    }

    fn ping(&self) -> bool {
        let conn = self.conn.lock().unwrap_or_else(PoisonError::into_inner);
        conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM shared_document WHERE id = ?1)",
            params![self.record_id],
            |row| row.get::<_, i64>(0),
        )
        .is_ok()
    }

    fn describe(&self) -> String {
        format!("sqlite {} (row '{}')", self.path.display(), self.record_id)
    }
}

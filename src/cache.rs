use std::path::{Path, PathBuf};

use rusqlite::Connection;

use crate::db;
use crate::domain::AppData;

pub const DOCUMENT_SLOT_KEY: &str = "carona_data";

/// Per-device copy of the document. Reads and writes never fail from the
/// caller's point of view; storage errors are logged and the in-memory
/// document stays authoritative.
pub struct LocalCache {
    conn: Connection,
    path: PathBuf,
}

impl LocalCache {
    pub fn open(path: &Path) -> rusqlite::Result<Self> {
        let conn = db::open_connection(path)?;
        Ok(Self {
            conn,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn write(&self, data: &AppData) {
        if let Err(err) = db::set_slot(&self.conn, DOCUMENT_SLOT_KEY, &data.to_json_text()) {
            log::warn!(
                "failed to write local cache '{}': {err}",
                self.path.display()
            );
        }
    }

    pub fn read(&self) -> Option<AppData> {
        match db::get_slot(&self.conn, DOCUMENT_SLOT_KEY) {
            Ok(Some(text)) => Some(AppData::from_text(&text)),
            Ok(None) => None,
            Err(err) => {
                log::warn!(
                    "failed to read local cache '{}': {err}",
                    self.path.display()
                );
                None
            }
        }
    }

    pub fn clear(&self) -> bool {
        match db::delete_slot(&self.conn, DOCUMENT_SLOT_KEY) {
            Ok(removed) => removed,
            Err(err) => {
                log::warn!(
                    "failed to clear local cache '{}': {err}",
                    self.path.display()
                );
                false
            }
        }
    }
}

use std::error::Error;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::config::RemoteConfig;

#[cfg(test)]
pub mod fake;
mod sqlite;
mod supabase;

pub use sqlite::SqliteRemote;
pub use supabase::SupabaseRemote;

pub const DEFAULT_RECORD_ID: &str = "carona_semana";

/// The shared durable copy of the document: one fixed row, read and written
/// whole.
pub trait RemoteStore: Send + Sync {
    /// `Ok(Some)` when the row holds a payload, `Ok(None)` when the row does
    /// not exist yet, `Err` when the store could not be reached or queried.
    fn read(&self) -> Result<Option<Value>, RemoteError>;

    fn write(&self, document: &Value) -> Result<(), RemoteError>;

    /// Cheapest reachability probe; only feeds the connectivity indicator.
    fn ping(&self) -> bool;

    fn describe(&self) -> String;
}

pub fn open_remote(config: &RemoteConfig) -> Result<Arc<dyn RemoteStore>, RemoteError> {
    match config {
        RemoteConfig::Offline => Ok(Arc::new(OfflineRemote)),
        RemoteConfig::Sqlite { path, record_id } => {
            Ok(Arc::new(SqliteRemote::open(path, record_id)?))
        }
        RemoteConfig::Supabase(settings) => Ok(Arc::new(SupabaseRemote::new(settings)?)),
    }
}

/// Stand-in used when no remote is configured: every call is unreachable.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineRemote;

impl RemoteStore for OfflineRemote {
    fn read(&self) -> Result<Option<Value>, RemoteError> {
        Err(RemoteError::NotConfigured)
    }

    fn write(&self, _document: &Value) -> Result<(), RemoteError> {
        Err(RemoteError::NotConfigured)
    }

    fn ping(&self) -> bool {
        false
    }

    fn describe(&self) -> String {
        "offline (no remote configured)".to_string()
    }
}

#[derive(Debug)]
pub enum RemoteError {
    Http(reqwest::Error),
    Status { code: u16, body: String },
    Decode(serde_json::Error),
    Db(rusqlite::Error),
    NotConfigured,
}

impl fmt::Display for RemoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemoteError::Http(err) => write!(f, "remote request failed: {}", err),
            RemoteError::Status { code, body } => {
                write!(f, "remote responded with status {}: {}", code, body)
            }
            RemoteError::Decode(err) => write!(f, "remote payload could not be decoded: {}", err),
            RemoteError::Db(err) => write!(f, "remote database error: {}", err),
            RemoteError::NotConfigured => write!(f, "no remote store configured"),
        }
    }
}

impl Error for RemoteError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            RemoteError::Http(err) => Some(err),
            RemoteError::Decode(err) => Some(err),
            RemoteError::Db(err) => Some(err),
            RemoteError::Status { .. } => None,
            RemoteError::NotConfigured => None,
        }
    }
}

impl From<reqwest::Error> for RemoteError {
    fn from(value: reqwest::Error) -> Self {
        RemoteError::Http(value)
    }
}

impl From<serde_json::Error> for RemoteError {
    fn from(value: serde_json::Error) -> Self {
        RemoteError::Decode(value)
    }
}

impl From<rusqlite::Error> for RemoteError {
    fn from(value: rusqlite::Error) -> Self {
        RemoteError::Db(value)
    }
}

#[cfg(test)]
mod tests {
    use super::{open_remote, OfflineRemote, RemoteError, RemoteStore};
    use crate::config::RemoteConfig;
    use serde_json::json;

    #[test]
    fn offline_remote_is_always_unreachable() {
        let remote = OfflineRemote;
        assert!(matches!(remote.read(), Err(RemoteError::NotConfigured)));
        assert!(matches!(
            remote.write(&json!({})),
            Err(RemoteError::NotConfigured)
        ));
        assert!(!remote.ping());
    }

    #[test]
    fn open_remote_builds_offline_by_default() {
        let remote = open_remote(&RemoteConfig::default()).expect("offline remote should open");
        assert!(remote.describe().contains("offline"));
    }

    #[test]
    fn status_error_mentions_code() {
        let err = RemoteError::Status {
            code: 503,
            body: "unavailable".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "remote responded with status 503: unavailable"
        );
    }
}

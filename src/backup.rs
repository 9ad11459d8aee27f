use std::error::Error;
use std::fmt;
use std::path::{Path, PathBuf};

use serde_json::Value;
use time::Date;

use crate::domain::AppData;

#[derive(Debug)]
pub enum BackupError {
    Io(std::io::Error),
    Json(serde_json::Error),
    Malformed(String),
}

impl fmt::Display for BackupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackupError::Io(err) => write!(f, "backup I/O error: {}", err),
            BackupError::Json(err) => write!(f, "backup is not valid JSON: {}", err),
            BackupError::Malformed(message) => write!(f, "malformed backup: {}", message),
        }
    }
}

impl Error for BackupError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            BackupError::Io(err) => Some(err),
            BackupError::Json(err) => Some(err),
            BackupError::Malformed(_) => None,
        }
    }
}

impl From<std::io::Error> for BackupError {
    fn from(value: std::io::Error) -> Self {
        BackupError::Io(value)
    }
}

impl From<serde_json::Error> for BackupError {
    fn from(value: serde_json::Error) -> Self {
        BackupError::Json(value)
    }
}

pub fn export_file_name(today: Date) -> String {
    format!(
        "carona-backup-{:04}-{:02}-{:02}.json",
        today.year(),
        u8::from(today.month()),
        today.day()
    )
}

/// Writes the whole document as pretty JSON into `dir` and returns the path.
pub fn export_document(doc: &AppData, dir: &Path, today: Date) -> Result<PathBuf, BackupError> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(export_file_name(today));
    let mut text = serde_json::to_string_pretty(doc)?;
    text.push('\n');
    std::fs::write(&path, text)?;
    Ok(path)
}

/// Reads a backup file. The top level must be a JSON object; everything
/// inside it is sanitized like any other untrusted payload.
pub fn read_import(path: &Path) -> Result<AppData, BackupError> {
    let raw = std::fs::read_to_string(path)?;
    let value: Value = serde_json::from_str(&raw)?;
    if !value.is_object() {
        return Err(BackupError::Malformed(
            "expected a JSON object at the top level".to_string(),
        ));
    }
    Ok(AppData::from_value(value))
}

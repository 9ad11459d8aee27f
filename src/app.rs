use std::error::Error;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use time::Date;

use crate::backup::{self, BackupError};
use crate::cache::LocalCache;
use crate::config::{Config, ConfigError};
use crate::domain::dates::{now_local, parse_date, trip_day_label};
use crate::domain::{AppData, TripType};
use crate::merge::{self, MergeError, MergeOutcome, TripRequest};
use crate::remote::{open_remote, RemoteError, RemoteStore};
use crate::report::render_report;
use crate::sync::{Connectivity, LoadOrigin, SyncEngine};
use crate::trips::{self, TripError};
use crate::weeks::{self, DeletedWeek, WeekChange, WeekError, WeekSummary};

pub struct App {
    engine: SyncEngine,
    fare_cents: u64,
}

#[derive(Debug, Clone)]
pub struct AddTripInput {
    pub date: Option<String>,
    pub directions: Vec<TripType>,
    pub time: Option<String>,
    pub selected: Vec<String>,
    pub typed: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct StatusView {
    pub week: String,
    pub trips: usize,
    pub archives: usize,
    pub loaded_from: LoadOrigin,
    pub remote: String,
    pub connectivity: String,
    pub cache_path: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ImportSummary {
    pub week: String,
    pub trips: usize,
    pub archives: usize,
}

impl App {
    pub fn open(config: &Config, cache_path: &Path) -> Result<Self, AppError> {
        ensure_parent_dir(cache_path)?;
        let local = LocalCache::open(cache_path)?;
        let remote = open_remote(&config.remote)?;
        Ok(Self::with_stores(local, remote, config))
    }

    pub fn with_stores(local: LocalCache, remote: Arc<dyn RemoteStore>, config: &Config) -> Self {
        Self {
            engine: SyncEngine::load(local, remote, config.debounce()),
            fare_cents: config.fare_cents,
        }
    }

    pub fn document(&self) -> &AppData {
        self.engine.document()
    }

    pub fn remote(&self) -> Arc<dyn RemoteStore> {
        Arc::clone(self.engine.remote())
    }

    pub fn add_trip(&mut self, input: AddTripInput) -> Result<Vec<MergeOutcome>, AppError> {
        let now = now_local();
        let date = match input.date.as_deref() {
            Some(raw) => parse_date_arg(raw)?,
            None => now.date(),
        };
        let request = TripRequest {
            date,
            directions: input.directions,
            time: input.time,
            names: merge::collect_names(&input.selected, &input.typed),
        };
        Ok(self
            .engine
            .update(|doc| merge::add_trips(doc, request, now))?)
    }

    pub fn toggle_paid(
        &mut self,
        day: &str,
        trip_type: TripType,
        who: &str,
    ) -> Result<bool, AppError> {
        let day = day_label(day);
        Ok(self
            .engine
            .update(|doc| trips::toggle_paid(doc, &day, trip_type, who))?)
    }

    pub fn rename_participant(
        &mut self,
        day: &str,
        trip_type: TripType,
        who: &str,
        new_name: &str,
    ) -> Result<(), AppError> {
        let day = day_label(day);
        Ok(self.engine.update(|doc| {
            trips::rename_participant(doc, &day, trip_type, who, new_name)
        })?)
    }

    pub fn remove_participant(
        &mut self,
        day: &str,
        trip_type: TripType,
        who: &str,
    ) -> Result<String, AppError> {
        let day = day_label(day);
        let removed = self
            .engine
            .update(|doc| trips::remove_participant(doc, &day, trip_type, who))?;
        Ok(removed.name)
    }

    pub fn remove_trip(&mut self, day: &str, trip_type: TripType) -> Result<String, AppError> {
        let day = day_label(day);
        let removed = self
            .engine
            .update(|doc| trips::remove_trip(doc, &day, trip_type))?;
        Ok(removed.day)
    }

    pub fn known_names(&self) -> Vec<String> {
        trips::known_names(self.document())
    }

    pub fn start_week(&mut self, start: Option<&str>) -> Result<WeekChange, AppError> {
        let start = start.map(parse_date_arg).transpose()?;
        let now = now_local();
        Ok(self
            .engine
            .update(|doc| weeks::start_week(doc, start, now))?)
    }

    pub fn select_week(&mut self, name: &str) -> Result<WeekChange, AppError> {
        let now = now_local();
        Ok(self
            .engine
            .update(|doc| weeks::select_week(doc, name, now))?)
    }

    pub fn delete_week(&mut self, name: &str) -> Result<DeletedWeek, AppError> {
        Ok(self.engine.update(|doc| weeks::delete_week(doc, name))?)
    }

    pub fn list_weeks(&self) -> Vec<WeekSummary> {
        weeks::list_weeks(self.document())
    }

    pub fn report(&self) -> String {
        render_report(self.document(), self.fare_cents)
    }

    pub fn export(&self, dir: &Path) -> Result<PathBuf, AppError> {
        Ok(backup::export_document(
            self.document(),
            dir,
            now_local().date(),
        )?)
    }

    pub fn import(&mut self, path: &Path) -> Result<ImportSummary, AppError> {
        let doc = backup::read_import(path)?;
        let summary = ImportSummary {
            week: doc.current_week_name.clone(),
            trips: doc.active_trips.len(),
            archives: doc.archives.len(),
        };
        self.engine.save(doc);
        Ok(summary)
    }

    pub fn factory_reset(&mut self) {
        self.engine.factory_reset();
    }

    /// Pings the remote once; the document itself is already loaded.
    pub fn status(&self) -> StatusView {
        let remote = self.engine.remote();
        let connectivity = if remote.ping() {
            Connectivity::Online
        } else {
            Connectivity::Offline
        };
        let doc = self.document();
        StatusView {
            week: doc.current_week_name.clone(),
            trips: doc.active_trips.len(),
            archives: doc.archives.len(),
            loaded_from: self.engine.origin(),
            remote: remote.describe(),
            connectivity: connectivity.to_string(),
            cache_path: self.engine.local().path().display().to_string(),
        }
    }

    /// Flushes any pending remote push. Dropping the app does the same.
    pub fn close(self) {
        self.engine.close();
    }
}

/// A date argument becomes the stored day label; anything else is taken as
/// a label already.
fn day_label(raw: &str) -> String {
    match parse_date(raw) {
        Some(date) => trip_day_label(date),
        None => raw.trim().to_string(),
    }
}

fn parse_date_arg(raw: &str) -> Result<Date, AppError> {
    parse_date(raw).ok_or_else(|| {
        AppError::InvalidArgument(format!(
            "invalid date '{}': use YYYY-MM-DD or DD/MM/YYYY",
            raw
        ))
    })
}

fn ensure_parent_dir(path: &Path) -> Result<(), AppError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}

#[derive(Debug)]
pub enum AppError {
    Io(std::io::Error),
    Db(rusqlite::Error),
    Config(ConfigError),
    Remote(RemoteError),
    Week(WeekError),
    Merge(MergeError),
    Trip(TripError),
    Backup(BackupError),
    InvalidArgument(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Io(err) => write!(f, "I/O error: {}", err),
            AppError::Db(err) => write!(f, "database error: {}", err),
            AppError::Config(err) => write!(f, "{}", err),
            AppError::Remote(err) => write!(f, "remote setup failed: {}", err),
            AppError::Week(err) => write!(f, "{}", err),
            AppError::Merge(err) => write!(f, "{}", err),
            AppError::Trip(err) => write!(f, "{}", err),
            AppError::Backup(err) => write!(f, "{}", err),
            AppError::InvalidArgument(message) => write!(f, "{}", message),
        }
    }
}

impl Error for AppError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            AppError::Io(err) => Some(err),
            AppError::Db(err) => Some(err),
            AppError::Config(err) => Some(err),
            AppError::Remote(err) => Some(err),
            AppError::Week(err) => Some(err),
            AppError::Merge(err) => Some(err),
            AppError::Trip(err) => Some(err),
            AppError::Backup(err) => Some(err),
            AppError::InvalidArgument(_) => None,
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        AppError::Io(value)
    }
}

impl From<rusqlite::Error> for AppError {
    fn from(value: rusqlite::Error) -> Self {
        AppError::Db(value)
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        AppError::Config(value)
    }
}

impl From<RemoteError> for AppError {
    fn from(value: RemoteError) -> Self {
        AppError::Remote(value)
    }
}

impl From<WeekError> for AppError {
    fn from(value: WeekError) -> Self {
        AppError::Week(value)
    }
}

impl From<MergeError> for AppError {
    fn from(value: MergeError) -> Self {
        AppError::Merge(value)
    }
}

impl From<TripError> for AppError {
    fn from(value: TripError) -> Self {
        AppError::Trip(value)
    }
}

impl From<BackupError> for AppError {
    fn from(value: BackupError) -> Self {
        AppError::Backup(value)
    }
}

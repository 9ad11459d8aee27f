use std::error::Error;
use std::fmt;

use serde::Serialize;
use time::{Date, OffsetDateTime};

use crate::domain::dates::{add_days, format_date_br};
use crate::domain::{AppData, DEFAULT_WEEK_NAME};

const WEEK_SPAN_DAYS: i64 = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WeekError {
    Validation(String),
    Collision(String),
    NotFound(String),
}

impl fmt::Display for WeekError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeekError::Validation(message) => write!(f, "{}", message),
            WeekError::Collision(name) => write!(f, "week '{}' already exists", name),
            WeekError::NotFound(name) => write!(f, "week '{}' not found", name),
        }
    }
}

impl Error for WeekError {}

/// Result of switching the active week.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct WeekChange {
    pub current: String,
    pub archived: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DeletedWeek {
    /// The active week was emptied and renamed back to the default.
    Current,
    Archive,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct WeekSummary {
    pub name: String,
    pub current: bool,
    pub trips: usize,
    pub participants: usize,
}

/// `Semana 03/06/2024 - 07/06/2024` for a Monday start.
pub fn derive_week_name(start: Option<Date>) -> Option<String> {
    let start = start?;
    let end = add_days(start, WEEK_SPAN_DAYS)?;
    Some(format!(
        "Semana {} - {}",
        format_date_br(start),
        format_date_br(end)
    ))
}

/// Moves the active week into the archives and resets it to the default
/// name. Returns the archive key, or `None` when there was nothing to keep.
pub fn rotate(doc: &mut AppData, now: OffsetDateTime) -> Option<String> {
    let name = doc.current_week_name.clone();
    let is_default = doc.is_default_week();
    let already_archived = doc.archives.contains_key(&name);
    if doc.active_trips.is_empty() && (is_default || already_archived) {
        return None;
    }

    let key = if is_default || already_archived {
        disambiguated_key(doc, &name, now)
    } else {
        name
    };
    let snapshot = std::mem::take(&mut doc.active_trips);
    doc.archives.insert(key.clone(), snapshot);
    doc.current_week_name = DEFAULT_WEEK_NAME.to_string();
    log::debug!("archived active week as '{key}'");
    Some(key)
}

fn disambiguated_key(doc: &AppData, name: &str, now: OffsetDateTime) -> String {
    let stamp = format_date_br(now.date());
    let mut ticker = u64::from(now.millisecond());
    loop {
        let candidate = format!("{name} (Arq. {stamp}-{ticker})");
        if !doc.archives.contains_key(&candidate) {
            return candidate;
        }
        ticker += 1;
    }
}

pub fn start_week(
    doc: &mut AppData,
    start: Option<Date>,
    now: OffsetDateTime,
) -> Result<WeekChange, WeekError> {
    let Some(name) = derive_week_name(start) else {
        return Err(WeekError::Validation(
            "a start date is required to create a week".to_string(),
        ));
    };
    if doc.archives.contains_key(&name) || doc.current_week_name == name {
        return Err(WeekError::Collision(name));
    }

    let archived = rotate(doc, now);
    doc.active_trips.clear();
    doc.current_week_name = name.clone();
    Ok(WeekChange {
        current: name,
        archived,
    })
}

pub fn select_week(
    doc: &mut AppData,
    name: &str,
    now: OffsetDateTime,
) -> Result<WeekChange, WeekError> {
    // the sentinel still rotates so its trips land in an archive
    if doc.current_week_name == name && !doc.is_default_week() {
        return Ok(WeekChange {
            current: name.to_string(),
            archived: None,
        });
    }
    let to_default = name == DEFAULT_WEEK_NAME;
    if !to_default && !doc.archives.contains_key(name) {
        return Err(WeekError::NotFound(name.to_string()));
    }

    let archived = rotate(doc, now);
    if to_default {
        doc.active_trips.clear();
    } else {
        // rotate never writes over an existing key, so the slot is intact
        doc.active_trips = doc.archives.remove(name).unwrap_or_default();
    }
    doc.current_week_name = name.to_string();
    Ok(WeekChange {
        current: name.to_string(),
        archived,
    })
}

pub fn delete_week(doc: &mut AppData, name: &str) -> Result<DeletedWeek, WeekError> {
    if doc.current_week_name == name {
        doc.active_trips.clear();
        doc.current_week_name = DEFAULT_WEEK_NAME.to_string();
        return Ok(DeletedWeek::Current);
    }
    match doc.archives.remove(name) {
        Some(_) => Ok(DeletedWeek::Archive),
        None => Err(WeekError::NotFound(name.to_string())),
    }
}

pub fn list_weeks(doc: &AppData) -> Vec<WeekSummary> {
    let current = std::iter::once((&doc.current_week_name, &doc.active_trips, true));
    let archived = doc
        .archives
        .iter()
        .map(|(name, trips)| (name, trips, false));
    current
        .chain(archived)
        .map(|(name, trips, current)| WeekSummary {
            name: name.clone(),
            current,
            trips: trips.len(),
            participants: trips.iter().map(|trip| trip.participants.len()).sum(),
        })
        .collect()
}

#[cfg(test)]
#[path = "weeks_tests.rs"]
mod tests;

use std::collections::HashSet;
use std::error::Error;
use std::fmt;

use serde::Serialize;
use time::{Date, OffsetDateTime};

use crate::domain::collate::compare_names;
use crate::domain::dates::trip_day_label;
use crate::domain::document::trip_id_seed;
use crate::domain::{AppData, Participant, Trip, TripType};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeError {
    NoParticipants,
    NoDirection,
    InvalidTime(String),
}

impl fmt::Display for MergeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MergeError::NoParticipants => write!(f, "select or type at least one participant"),
            MergeError::NoDirection => write!(f, "choose at least one direction (Ida or Volta)"),
            MergeError::InvalidTime(raw) => {
                write!(f, "invalid time '{}': expected HH:MM", raw)
            }
        }
    }
}

impl Error for MergeError {}

/// One "add trip" submission, possibly covering both directions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TripRequest {
    pub date: Date,
    pub directions: Vec<TripType>,
    pub time: Option<String>,
    pub names: Vec<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct MergeOutcome {
    pub day: String,
    #[serde(rename = "type")]
    pub trip_type: TripType,
    pub created: bool,
    pub participants: usize,
}

/// Union of picked names and one-name-per-line typed text, first
/// occurrence wins.
pub fn collect_names(selected: &[String], typed: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    selected
        .iter()
        .map(String::as_str)
        .chain(typed.lines())
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .filter(|name| seen.insert(name.to_string()))
        .map(str::to_string)
        .collect()
}

/// The participant list for `target`: existing entries are reused by exact
/// name with their id and paid flag, anyone else joins unpaid with an id
/// seeded by `trip_seed`.
pub fn merge_participants(
    existing: &[Participant],
    target: &[String],
    trip_seed: &str,
    now: OffsetDateTime,
) -> Vec<Participant> {
    let mut seen = HashSet::new();
    let mut merged: Vec<Participant> = target
        .iter()
        .filter(|name| seen.insert(*name))
        .map(|name| {
            existing
                .iter()
                .find(|participant| participant.name == *name)
                .cloned()
                .unwrap_or_else(|| Participant::new(name, trip_seed, now))
        })
        .collect();
    merged.sort_by(|left, right| compare_names(&left.name, &right.name));
    merged
}

pub fn add_trips(
    doc: &mut AppData,
    request: TripRequest,
    now: OffsetDateTime,
) -> Result<Vec<MergeOutcome>, MergeError> {
    if request.names.is_empty() {
        return Err(MergeError::NoParticipants);
    }
    if request.directions.is_empty() {
        return Err(MergeError::NoDirection);
    }
    let time = request.time.as_deref().map(normalize_time).transpose()?;

    let day = trip_day_label(request.date);
    let mut directions = request.directions;
    directions.sort();
    directions.dedup();

    let mut outcomes = Vec::with_capacity(directions.len());
    for trip_type in directions {
        let seed = trip_id_seed(&day, trip_type);
        let created = match doc.trip_mut(&day, trip_type) {
            Some(trip) => {
                trip.participants =
                    merge_participants(&trip.participants, &request.names, &seed, now);
                if time.is_some() {
                    trip.time = time.clone();
                }
                false
            }
            None => {
                let mut trip = Trip::new(day.clone(), trip_type);
                trip.time = time.clone();
                trip.participants = merge_participants(&[], &request.names, &seed, now);
                doc.active_trips.push(trip);
                true
            }
        };
        let participants = doc
            .trip(&day, trip_type)
            .map_or(0, |trip| trip.participants.len());
        outcomes.push(MergeOutcome {
            day: day.clone(),
            trip_type,
            created,
            participants,
        });
    }
    Ok(outcomes)
}

/// Accepts `H:MM` or `HH:MM` and returns the zero-padded form.
fn normalize_time(raw: &str) -> Result<String, MergeError> {
    let invalid = || MergeError::InvalidTime(raw.to_string());
    let (hour, minute) = raw.trim().split_once(':').ok_or_else(invalid)?;
    if minute.len() != 2 {
        return Err(invalid());
    }
    let hour: u8 = hour.parse().map_err(|_| invalid())?;
    let minute: u8 = minute.parse().map_err(|_| invalid())?;
    let parsed = time::Time::from_hms(hour, minute, 0).map_err(|_| invalid())?;
    Ok(format!("{:02}:{:02}", parsed.hour(), parsed.minute()))
}

#[cfg(test)]
#[path = "merge_tests.rs"]
mod tests;

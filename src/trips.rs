use std::error::Error;
use std::fmt;

use crate::domain::collate::compare_names;
use crate::domain::{AppData, Participant, Trip, TripType};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TripError {
    TripNotFound { day: String, trip_type: TripType },
    ParticipantNotFound(String),
    BlankName,
    DuplicateName(String),
}

impl fmt::Display for TripError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TripError::TripNotFound { day, trip_type } => {
                write!(f, "no {} trip on '{}' in the active week", trip_type, day)
            }
            TripError::ParticipantNotFound(who) => {
                write!(f, "participant '{}' is not on this trip", who)
            }
            TripError::BlankName => write!(f, "participant name must not be blank"),
            TripError::DuplicateName(name) => {
                write!(f, "'{}' is already on this trip", name)
            }
        }
    }
}

impl Error for TripError {}

fn find_trip<'a>(
    doc: &'a mut AppData,
    day: &str,
    trip_type: TripType,
) -> Result<&'a mut Trip, TripError> {
    doc.trip_mut(day, trip_type)
        .ok_or_else(|| TripError::TripNotFound {
            day: day.to_string(),
            trip_type,
        })
}

/// Participants are addressed by id or by exact name.
fn participant_index(trip: &Trip, who: &str) -> Result<usize, TripError> {
    trip.participants
        .iter()
        .position(|participant| participant.id == who)
        .or_else(|| {
            trip.participants
                .iter()
                .position(|participant| participant.name == who)
        })
        .ok_or_else(|| TripError::ParticipantNotFound(who.to_string()))
}

/// Flips the paid flag and returns the new value.
pub fn toggle_paid(
    doc: &mut AppData,
    day: &str,
    trip_type: TripType,
    who: &str,
) -> Result<bool, TripError> {
    let trip = find_trip(doc, day, trip_type)?;
    let index = participant_index(trip, who)?;
    let participant = &mut trip.participants[index];
    participant.paid = !participant.paid;
    Ok(participant.paid)
}

pub fn rename_participant(
    doc: &mut AppData,
    day: &str,
    trip_type: TripType,
    who: &str,
    new_name: &str,
) -> Result<(), TripError> {
    let new_name = new_name.trim();
    if new_name.is_empty() {
        return Err(TripError::BlankName);
    }
    let trip = find_trip(doc, day, trip_type)?;
    let index = participant_index(trip, who)?;
    let clash = trip
        .participants
        .iter()
        .enumerate()
        .any(|(other, participant)| other != index && participant.name == new_name);
    if clash {
        return Err(TripError::DuplicateName(new_name.to_string()));
    }
    trip.participants[index].name = new_name.to_string();
    trip.sort_participants();
    Ok(())
}

pub fn remove_participant(
    doc: &mut AppData,
    day: &str,
    trip_type: TripType,
    who: &str,
) -> Result<Participant, TripError> {
    let trip = find_trip(doc, day, trip_type)?;
    let index = participant_index(trip, who)?;
    Ok(trip.participants.remove(index))
}

pub fn remove_trip(doc: &mut AppData, day: &str, trip_type: TripType) -> Result<Trip, TripError> {
    let index = doc
        .active_trips
        .iter()
        .position(|trip| trip.matches(day, trip_type))
        .ok_or_else(|| TripError::TripNotFound {
            day: day.to_string(),
            trip_type,
        })?;
    Ok(doc.active_trips.remove(index))
}

/// Every distinct name seen in the active week or any archive.
pub fn known_names(doc: &AppData) -> Vec<String> {
    let mut names: Vec<String> = doc
        .active_trips
        .iter()
        .chain(doc.archives.values().flatten())
        .flat_map(|trip| trip.participants.iter())
        .map(|participant| participant.name.clone())
        .collect();
    names.sort_by(|left, right| compare_names(left, right));
    names.dedup();
    names
}

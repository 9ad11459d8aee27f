use std::collections::BTreeMap;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{json, Map, Value};
use sha2::{Digest, Sha256};
use time::OffsetDateTime;

use super::collate::compare_names;
use super::trip_type::TripType;

pub const DEFAULT_WEEK_NAME: &str = "Semana Atual";

const ACTIVE_TRIPS_KEY: &str = "active_trips";
const CURRENT_WEEK_KEY: &str = "currentWeekName";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Participant {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub paid: bool,
}

impl Participant {
    /// A fresh unpaid entry; `trip_seed` keeps the same person's ids apart
    /// across the trips they join in one go.
    pub fn new(name: &str, trip_seed: &str, created_at: OffsetDateTime) -> Self {
        let seed = format!("{trip_seed}|{}", created_at.unix_timestamp_nanos());
        Self {
            id: participant_id(name, &seed),
            name: name.to_string(),
            paid: false,
        }
    }
}

pub fn trip_id_seed(day: &str, trip_type: TripType) -> String {
    format!("{day}|{trip_type}")
}

/// Stable participant id: `p-` plus a SHA-256 prefix over name and seed.
pub fn participant_id(name: &str, seed: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(name.as_bytes());
    hasher.update([0u8]);
    hasher.update(seed.as_bytes());
    let digest = format!("{:x}", hasher.finalize());
    format!("p-{}", &digest[..16])
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Trip {
    pub day: String,
    #[serde(rename = "type")]
    pub trip_type: TripType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(default)]
    pub participants: Vec<Participant>,
}

impl Trip {
    pub fn new(day: impl Into<String>, trip_type: TripType) -> Self {
        Self {
            day: day.into(),
            trip_type,
            time: None,
            participants: Vec::new(),
        }
    }

    pub fn matches(&self, day: &str, trip_type: TripType) -> bool {
        self.day == day && self.trip_type == trip_type
    }

    pub fn sort_participants(&mut self) {
        self.participants
            .sort_by(|left, right| compare_names(&left.name, &right.name));
    }

    pub fn paid_count(&self) -> usize {
        self.participants.iter().filter(|p| p.paid).count()
    }
}

/// The whole persisted document. Archived weeks live in their own map so a
/// week name can never shadow `active_trips` or `currentWeekName`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppData {
    pub active_trips: Vec<Trip>,
    pub current_week_name: String,
    pub archives: BTreeMap<String, Vec<Trip>>,
}

impl Default for AppData {
    fn default() -> Self {
        Self {
            active_trips: Vec::new(),
            current_week_name: DEFAULT_WEEK_NAME.to_string(),
            archives: BTreeMap::new(),
        }
    }
}

impl AppData {
    /// Sanitizes cached or imported text. Anything unreadable becomes the
    /// empty default document.
    pub fn from_text(text: &str) -> Self {
        match serde_json::from_str::<Value>(text) {
            Ok(value) => Self::from_value(value),
            Err(err) => {
                log::debug!("document text is not JSON, using defaults: {err}");
                Self::default()
            }
        }
    }

    /// Sanitizes a structured payload (remote row, parsed import).
    pub fn from_value(value: Value) -> Self {
        let Value::Object(mut fields) = value else {
            log::debug!("document payload is not an object, using defaults");
            return Self::default();
        };

        let active_trips = fields
            .remove(ACTIVE_TRIPS_KEY)
            .map(sanitize_trips)
            .unwrap_or_default();
        let current_week_name = match fields.remove(CURRENT_WEEK_KEY) {
            Some(Value::String(name)) => name,
            _ => DEFAULT_WEEK_NAME.to_string(),
        };

        let mut archives = BTreeMap::new();
        for (key, value) in fields {
            if value.is_array() {
                archives.insert(key, sanitize_trips(value));
            } else {
                log::debug!("dropping non-archive document key '{key}'");
            }
        }

        Self {
            active_trips,
            current_week_name,
            archives,
        }
    }

    pub fn to_value(&self) -> Value {
        let mut fields = Map::new();
        for (name, trips) in &self.archives {
            fields.insert(name.clone(), json!(trips));
        }
        fields.insert(ACTIVE_TRIPS_KEY.to_string(), json!(self.active_trips));
        fields.insert(
            CURRENT_WEEK_KEY.to_string(),
            Value::String(self.current_week_name.clone()),
        );
        Value::Object(fields)
    }

    pub fn to_json_text(&self) -> String {
        self.to_value().to_string()
    }

    pub fn is_default_week(&self) -> bool {
        self.current_week_name == DEFAULT_WEEK_NAME
    }

    pub fn trip(&self, day: &str, trip_type: TripType) -> Option<&Trip> {
        self.active_trips
            .iter()
            .find(|trip| trip.matches(day, trip_type))
    }

    pub fn trip_mut(&mut self, day: &str, trip_type: TripType) -> Option<&mut Trip> {
        self.active_trips
            .iter_mut()
            .find(|trip| trip.matches(day, trip_type))
    }
}

impl Serialize for AppData {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.archives.len() + 2))?;
        map.serialize_entry(ACTIVE_TRIPS_KEY, &self.active_trips)?;
        map.serialize_entry(CURRENT_WEEK_KEY, &self.current_week_name)?;
        for (name, trips) in &self.archives {
            map.serialize_entry(name, trips)?;
        }
        map.end()
    }
}

#[derive(Deserialize)]
struct RawTrip {
    day: String,
    #[serde(rename = "type")]
    trip_type: TripType,
    #[serde(default)]
    time: Option<String>,
    #[serde(default)]
    participants: Option<Vec<Value>>,
}

#[derive(Deserialize)]
struct RawParticipant {
    #[serde(default)]
    id: Option<String>,
    name: String,
    #[serde(default)]
    paid: Option<bool>,
}

fn sanitize_trips(value: Value) -> Vec<Trip> {
    let Value::Array(entries) = value else {
        return Vec::new();
    };
    entries
        .into_iter()
        .filter_map(|entry| match serde_json::from_value::<RawTrip>(entry) {
            Ok(raw) => Some(sanitize_trip(raw)),
            Err(err) => {
                log::debug!("dropping malformed trip: {err}");
                None
            }
        })
        .collect()
}

fn sanitize_trip(raw: RawTrip) -> Trip {
    let seed = trip_id_seed(&raw.day, raw.trip_type);
    let participants = raw
        .participants
        .unwrap_or_default()
        .into_iter()
        .filter_map(|entry| serde_json::from_value::<RawParticipant>(entry).ok())
        .map(|raw_participant| {
            let id = match raw_participant.id {
                Some(id) if !id.trim().is_empty() => id,
                _ => participant_id(&raw_participant.name, &seed),
            };
            Participant {
                id,
                name: raw_participant.name,
                paid: raw_participant.paid.unwrap_or_default(),
            }
        })
        .collect();

    Trip {
        day: raw.day,
        trip_type: raw.trip_type,
        time: raw.time,
        participants,
    }
}

#[cfg(test)]
#[path = "document_tests.rs"]
mod tests;

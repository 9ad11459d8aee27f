use std::error::Error;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Direction of one trip leg: `Ida` is the outbound ride, `Volta` the return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TripType {
    Ida,
    Volta,
}

impl TripType {
    pub const ALL: [TripType; 2] = [TripType::Ida, TripType::Volta];

    pub fn as_str(self) -> &'static str {
        match self {
            TripType::Ida => "Ida",
            TripType::Volta => "Volta",
        }
    }
}

impl fmt::Display for TripType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TripType {
    type Err = ParseTripTypeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_lowercase();
        match normalized.as_str() {
            "ida" => Ok(TripType::Ida),
            "volta" => Ok(TripType::Volta),
            _ => Err(ParseTripTypeError {
                value: value.to_string(),
            }),
        }
    }
}

impl Serialize for TripType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for TripType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        TripType::from_str(&raw).map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseTripTypeError {
    value: String,
}

impl fmt::Display for ParseTripTypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid trip type '{}': expected one of {}",
            self.value,
            TripType::ALL
                .iter()
                .map(|kind| kind.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}

impl Error for ParseTripTypeError {}

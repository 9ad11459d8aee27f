pub mod collate;
pub mod dates;
pub mod document;
pub mod trip_type;

pub use document::{AppData, Participant, Trip, DEFAULT_WEEK_NAME};
pub use trip_type::TripType;

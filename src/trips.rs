//! Trip log loading.
//!
//! Reads a delimited trip export (one row per rental) into typed records.
//! Malformed rows are skipped and logged rather than aborting the load.

use anyhow::Result;
use chrono::NaiveDateTime;
use serde::Deserialize;
use std::io::Read;
use tracing::{debug, warn};

/// One rental event. Immutable once parsed; aggregation borrows these,
/// never mutates them.
#[derive(Debug, Clone, PartialEq)]
pub struct Trip {
    pub start_station_id: String,
    pub end_station_id: String,
    pub started_at: NaiveDateTime,
    pub ended_at: NaiveDateTime,
}

/// A CSV row as it arrives, before validation. Exports carry extra columns
/// (ride id, bike type, station names); those are ignored.
#[derive(Debug, Deserialize)]
struct RawTrip {
    start_station_id: Option<String>,
    end_station_id: Option<String>,
    started_at: Option<String>,
    ended_at: Option<String>,
}

/// Timestamp layouts seen across trip exports: plain wall clock, wall clock
/// with fractional seconds, and ISO 8601 with a `T` separator.
const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
];

fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw.trim(), format).ok())
}

fn non_empty(field: Option<String>) -> Option<String> {
    field.filter(|value| !value.trim().is_empty())
}

impl RawTrip {
    fn validate(self) -> Option<Trip> {
        Some(Trip {
            start_station_id: non_empty(self.start_station_id)?,
            end_station_id: non_empty(self.end_station_id)?,
            started_at: parse_timestamp(self.started_at.as_deref()?)?,
            ended_at: parse_timestamp(self.ended_at.as_deref()?)?,
        })
    }
}

/// Reads trip records from CSV data.
///
/// Rows with a missing station identifier or an unparseable timestamp are
/// skipped with a warning; the remaining rows are returned in file order.
///
/// # Errors
///
/// Returns an error only if the data is not readable as CSV at all.
pub fn read_trips<R: Read>(reader: R) -> Result<Vec<Trip>> {
    let mut rdr = csv::Reader::from_reader(reader);

    let mut trips = Vec::new();
    let mut skipped = 0usize;

    for (index, result) in rdr.deserialize().enumerate() {
        let raw: RawTrip = match result {
            Ok(raw) => raw,
            Err(error) => {
                skipped += 1;
                warn!(row = index + 1, error = %error, "Skipping unreadable trip row");
                continue;
            }
        };

        match raw.validate() {
            Some(trip) => trips.push(trip),
            None => {
                skipped += 1;
                warn!(row = index + 1, "Skipping malformed trip row");
            }
        }
    }

    if skipped > 0 {
        warn!(skipped, parsed = trips.len(), "Trip rows skipped");
    }
    debug!(total = trips.len(), "Trip log parsed");

    Ok(trips)
}

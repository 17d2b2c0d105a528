//! Station catalog loading.

use anyhow::{Context, Result};
use serde_json::Value;
use tracing::{debug, warn};

/// A fixed dock location from the station catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct Station {
    /// Unique short identifier; the key trips join against.
    pub short_name: String,
    pub name: String,
    pub lat: f64,
    pub lon: f64,
}

/// Parses the station catalog document.
///
/// The catalog nests its station list under `data.stations`. Only the
/// fields needed downstream are extracted; rows missing an identifier or
/// with unparseable coordinates are skipped with a warning.
///
/// # Errors
///
/// Returns an error if the document is not JSON or has no `data.stations`
/// list.
pub fn parse_stations(bytes: &[u8]) -> Result<Vec<Station>> {
    let doc: Value =
        serde_json::from_slice(bytes).context("station catalog is not valid JSON")?;

    let rows = doc["data"]["stations"]
        .as_array()
        .context("station catalog has no data.stations list")?;

    let mut stations = Vec::with_capacity(rows.len());
    let mut skipped = 0usize;

    for row in rows {
        match parse_station(row) {
            Some(station) => stations.push(station),
            None => {
                skipped += 1;
                warn!(row = %row, "Skipping malformed station row");
            }
        }
    }

    if skipped > 0 {
        warn!(skipped, parsed = stations.len(), "Station rows skipped");
    }
    debug!(total = stations.len(), "Station catalog parsed");

    Ok(stations)
}

fn parse_station(row: &Value) -> Option<Station> {
    Some(Station {
        short_name: row["short_name"].as_str()?.to_string(),
        name: row["name"].as_str().unwrap_or_default().to_string(),
        lat: coordinate(&row["lat"])?,
        lon: coordinate(&row["lon"])?,
    })
}

/// Coordinates arrive as JSON numbers in some catalog exports and as
/// numeric strings in others.
fn coordinate(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_stations_nested_document() {
        let doc = br#"{
            "data": {
                "stations": [
                    {"short_name": "A32000", "name": "Central Square", "lat": 42.3656, "lon": -71.1043},
                    {"short_name": "B32001", "name": "Vassar St", "lat": 42.3554, "lon": -71.1044}
                ]
            }
        }"#;

        let stations = parse_stations(doc).unwrap();

        assert_eq!(stations.len(), 2);
        assert_eq!(stations[0].short_name, "A32000");
        assert_eq!(stations[0].name, "Central Square");
        assert_eq!(stations[0].lat, 42.3656);
        assert_eq!(stations[1].lon, -71.1044);
    }

    #[test]
    fn test_parse_stations_string_coordinates() {
        let doc = br#"{
            "data": {
                "stations": [
                    {"short_name": "A1", "name": "Dock", "lat": "42.35", "lon": "-71.10"}
                ]
            }
        }"#;

        let stations = parse_stations(doc).unwrap();

        assert_eq!(stations[0].lat, 42.35);
        assert_eq!(stations[0].lon, -71.10);
    }

    #[test]
    fn test_parse_stations_skips_rows_missing_identifier() {
        let doc = br#"{
            "data": {
                "stations": [
                    {"name": "Nameless", "lat": 42.0, "lon": -71.0},
                    {"short_name": "A1", "name": "Dock", "lat": 42.0, "lon": -71.0}
                ]
            }
        }"#;

        let stations = parse_stations(doc).unwrap();

        assert_eq!(stations.len(), 1);
        assert_eq!(stations[0].short_name, "A1");
    }

    #[test]
    fn test_parse_stations_skips_bad_coordinates() {
        let doc = br#"{
            "data": {
                "stations": [
                    {"short_name": "A1", "name": "Dock", "lat": "north", "lon": -71.0}
                ]
            }
        }"#;

        let stations = parse_stations(doc).unwrap();

        assert!(stations.is_empty());
    }

    #[test]
    fn test_parse_stations_missing_name_defaults_empty() {
        let doc = br#"{
            "data": {
                "stations": [
                    {"short_name": "A1", "lat": 42.0, "lon": -71.0}
                ]
            }
        }"#;

        let stations = parse_stations(doc).unwrap();

        assert_eq!(stations[0].name, "");
    }

    #[test]
    fn test_parse_stations_rejects_non_json() {
        assert!(parse_stations(b"short_name,lat\nA1,42.0\n").is_err());
    }

    #[test]
    fn test_parse_stations_rejects_missing_list() {
        assert!(parse_stations(br#"{"data": {}}"#).is_err());
        assert!(parse_stations(br#"{"stations": []}"#).is_err());
    }
}

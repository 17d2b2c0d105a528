//! The marker payload consumed by the map overlay.
//!
//! The front end binds these records to circles keyed by `short_name` and
//! re-projects positions on every map move; radius and tooltip arrive
//! precomputed.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::scale::RadiusScale;
use crate::timeofday::TimeFilter;
use crate::traffic::{self, StationTraffic};

/// One station marker, ready to draw.
#[derive(Debug, Serialize)]
pub struct Marker {
    /// Data-join key for the overlay.
    pub short_name: String,
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    /// Pixel radius from the active [`RadiusScale`].
    pub radius: f64,
    pub departures: usize,
    pub arrivals: usize,
    pub total_trips: usize,
    pub tooltip: String,
}

/// Complete overlay payload for one filter state.
#[derive(Debug, Serialize)]
pub struct MarkerDocument {
    pub schema_version: u8,
    pub generated_at: DateTime<Utc>,
    /// Target minute of the day, absent when unfiltered.
    pub time_filter: Option<u16>,
    /// 12-hour clock label for the slider readout, or "any time".
    pub time_label: String,
    pub station_count: usize,
    /// Trips in the source log.
    pub trip_count: usize,
    /// Trips surviving the time filter.
    pub active_trip_count: usize,
    pub markers: Vec<Marker>,
}

/// Assembles the overlay document for an aggregated station set.
///
/// The radius scale domain is the largest trip total in the set, and the
/// range follows the filter state: `[0, 25]` unfiltered, `[3, 50]`
/// filtered.
pub fn build_document(
    filter: TimeFilter,
    traffic: Vec<StationTraffic>,
    trip_count: usize,
    active_trip_count: usize,
) -> MarkerDocument {
    let scale = RadiusScale::for_filter(filter, traffic::max_total(&traffic));

    let markers: Vec<Marker> = traffic
        .into_iter()
        .map(|station| {
            let tooltip = station.tooltip();
            Marker {
                radius: scale.radius(station.total_trips),
                short_name: station.short_name,
                name: station.name,
                lat: station.lat,
                lon: station.lon,
                departures: station.departures,
                arrivals: station.arrivals,
                total_trips: station.total_trips,
                tooltip,
            }
        })
        .collect();

    MarkerDocument {
        schema_version: 1,
        generated_at: Utc::now(),
        time_filter: filter.minute(),
        time_label: filter.label(),
        station_count: markers.len(),
        trip_count,
        active_trip_count,
        markers,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn station(short_name: &str, total: usize) -> StationTraffic {
        StationTraffic {
            short_name: short_name.to_string(),
            name: format!("{short_name} dock"),
            lat: 42.36,
            lon: -71.09,
            departures: total,
            arrivals: 0,
            total_trips: total,
        }
    }

    #[test]
    fn test_build_document_unfiltered() {
        let doc = build_document(
            TimeFilter::Any,
            vec![station("A", 4), station("B", 0)],
            4,
            4,
        );

        assert_eq!(doc.time_filter, None);
        assert_eq!(doc.time_label, "any time");
        assert_eq!(doc.station_count, 2);
        assert_eq!(doc.markers[0].radius, 25.0); // at the domain max
        assert_eq!(doc.markers[1].radius, 0.0);
    }

    #[test]
    fn test_build_document_filtered_uses_wider_range() {
        let doc = build_document(
            TimeFilter::Minute(845),
            vec![station("A", 4), station("B", 0)],
            10,
            4,
        );

        assert_eq!(doc.time_filter, Some(845));
        assert_eq!(doc.time_label, "2:05 PM");
        assert_eq!(doc.trip_count, 10);
        assert_eq!(doc.active_trip_count, 4);
        assert_eq!(doc.markers[0].radius, 50.0);
        assert_eq!(doc.markers[1].radius, 3.0);
    }

    #[test]
    fn test_marker_tooltip_and_key() {
        let doc = build_document(TimeFilter::Any, vec![station("A32000", 2)], 2, 2);

        assert_eq!(doc.markers[0].short_name, "A32000");
        assert_eq!(doc.markers[0].tooltip, "2 trips (2 departures, 0 arrivals)");
    }

    #[test]
    fn test_build_document_serializes() {
        let doc = build_document(TimeFilter::Any, vec![station("A", 1)], 1, 1);
        let json = serde_json::to_value(&doc).unwrap();

        assert_eq!(json["schema_version"], 1);
        assert_eq!(json["markers"][0]["short_name"], "A");
        assert!(json["time_filter"].is_null());
    }
}

//! Per-station traffic aggregation.

use serde::Serialize;
use std::collections::HashMap;

use crate::catalog::Station;
use crate::trips::Trip;

/// Arrival/departure counts for one station, derived from a trip set.
///
/// Always freshly built by [`compute_traffic`]; the station catalog itself
/// is never mutated by recomputation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationTraffic {
    pub short_name: String,
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    pub departures: usize,
    pub arrivals: usize,
    pub total_trips: usize,
}

impl StationTraffic {
    /// The marker tooltip text shown on hover.
    pub fn tooltip(&self) -> String {
        format!(
            "{} trips ({} departures, {} arrivals)",
            self.total_trips, self.departures, self.arrivals
        )
    }
}

/// Counts arrivals and departures per station over a trip set.
///
/// One pass over the trips builds frequency tables keyed by start and end
/// station id; one pass over the catalog merges them, preserving catalog
/// order. Stations referenced by no trip get zero counts, and trips
/// referencing unknown station ids contribute nothing.
pub fn compute_traffic(stations: &[Station], trips: &[Trip]) -> Vec<StationTraffic> {
    let mut departures: HashMap<&str, usize> = HashMap::new();
    let mut arrivals: HashMap<&str, usize> = HashMap::new();

    for trip in trips {
        *departures.entry(trip.start_station_id.as_str()).or_default() += 1;
        *arrivals.entry(trip.end_station_id.as_str()).or_default() += 1;
    }

    stations
        .iter()
        .map(|station| {
            let id = station.short_name.as_str();
            let departures = departures.get(id).copied().unwrap_or(0);
            let arrivals = arrivals.get(id).copied().unwrap_or(0);

            StationTraffic {
                short_name: station.short_name.clone(),
                name: station.name.clone(),
                lat: station.lat,
                lon: station.lon,
                departures,
                arrivals,
                total_trips: departures + arrivals,
            }
        })
        .collect()
}

/// The largest trip total over a station set; the radius scale domain.
pub fn max_total(traffic: &[StationTraffic]) -> usize {
    traffic
        .iter()
        .map(|station| station.total_trips)
        .max()
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn station(short_name: &str) -> Station {
        Station {
            short_name: short_name.to_string(),
            name: format!("{short_name} dock"),
            lat: 42.36,
            lon: -71.09,
        }
    }

    fn trip(start: &str, end: &str) -> Trip {
        let noon = NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        Trip {
            start_station_id: start.to_string(),
            end_station_id: end.to_string(),
            started_at: noon,
            ended_at: noon,
        }
    }

    #[test]
    fn test_compute_traffic_counts() {
        let stations = vec![station("A"), station("B")];
        let trips = vec![trip("A", "B"), trip("A", "A")];

        let traffic = compute_traffic(&stations, &trips);

        assert_eq!(traffic[0].departures, 2);
        assert_eq!(traffic[0].arrivals, 1);
        assert_eq!(traffic[0].total_trips, 3);
        assert_eq!(traffic[1].departures, 0);
        assert_eq!(traffic[1].arrivals, 1);
        assert_eq!(traffic[1].total_trips, 1);
    }

    #[test]
    fn test_compute_traffic_preserves_station_order() {
        let stations = vec![station("C"), station("A"), station("B")];
        let traffic = compute_traffic(&stations, &[]);

        let ids: Vec<_> = traffic.iter().map(|t| t.short_name.as_str()).collect();
        assert_eq!(ids, vec!["C", "A", "B"]);
    }

    #[test]
    fn test_compute_traffic_unmatched_station_is_zero() {
        let stations = vec![station("A"), station("Z")];
        let trips = vec![trip("A", "A")];

        let traffic = compute_traffic(&stations, &trips);

        assert_eq!(traffic[1].departures, 0);
        assert_eq!(traffic[1].arrivals, 0);
        assert_eq!(traffic[1].total_trips, 0);
    }

    #[test]
    fn test_compute_traffic_unknown_trip_ids_contribute_nothing() {
        let stations = vec![station("A")];
        let trips = vec![trip("ghost", "phantom")];

        let traffic = compute_traffic(&stations, &trips);

        assert_eq!(traffic[0].total_trips, 0);
    }

    #[test]
    fn test_compute_traffic_totals_invariant() {
        let stations = vec![station("A"), station("B"), station("C")];
        let trips = vec![
            trip("A", "B"),
            trip("B", "C"),
            trip("C", "A"),
            trip("A", "A"),
            trip("B", "ghost"),
        ];

        let traffic = compute_traffic(&stations, &trips);

        for t in &traffic {
            assert_eq!(t.arrivals + t.departures, t.total_trips);
        }

        // Every trip endpoint that names a known station is counted once.
        let departures: usize = traffic.iter().map(|t| t.departures).sum();
        let arrivals: usize = traffic.iter().map(|t| t.arrivals).sum();
        assert_eq!(departures, 5);
        assert_eq!(arrivals, 4); // "ghost" absorbs one arrival
    }

    #[test]
    fn test_compute_traffic_is_idempotent() {
        let stations = vec![station("A"), station("B")];
        let trips = vec![trip("A", "B"), trip("B", "A"), trip("A", "A")];

        let first = compute_traffic(&stations, &trips);
        let second = compute_traffic(&stations, &trips);

        assert_eq!(first, second);
    }

    #[test]
    fn test_tooltip_text() {
        let traffic = StationTraffic {
            short_name: "A".to_string(),
            name: "A dock".to_string(),
            lat: 0.0,
            lon: 0.0,
            departures: 2,
            arrivals: 1,
            total_trips: 3,
        };

        assert_eq!(traffic.tooltip(), "3 trips (2 departures, 1 arrivals)");
    }

    #[test]
    fn test_max_total() {
        let stations = vec![station("A"), station("B")];
        let trips = vec![trip("A", "A"), trip("A", "B")];

        let traffic = compute_traffic(&stations, &trips);

        assert_eq!(max_total(&traffic), 3);
        assert_eq!(max_total(&[]), 0);
    }
}

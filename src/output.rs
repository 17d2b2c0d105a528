//! Output formatting and persistence for traffic results.
//!
//! Supports pretty-printing, the traffic table as CSV, and the marker
//! payload as JSON.

use anyhow::Result;
use tracing::debug;

use crate::markers::MarkerDocument;
use crate::traffic::StationTraffic;
use csv::WriterBuilder;
use std::fs;

/// Logs the traffic table using Rust's debug pretty-print format.
pub fn print_pretty(traffic: &[StationTraffic]) {
    debug!("{:#?}", traffic);
}

/// Writes the per-station traffic table as CSV, one row per station in
/// catalog order. An existing file is replaced; each run is a full
/// snapshot, not a log.
pub fn write_traffic_csv(path: &str, traffic: &[StationTraffic]) -> Result<()> {
    debug!(path, rows = traffic.len(), "Writing traffic CSV");

    let mut writer = WriterBuilder::new().from_path(path)?;
    for station in traffic {
        writer.serialize(station)?;
    }
    writer.flush()?;

    Ok(())
}

/// Serializes the marker payload to a JSON string.
pub fn markers_json(doc: &MarkerDocument, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(doc)?
    } else {
        serde_json::to_string(doc)?
    };
    Ok(json)
}

/// Writes the marker payload to a JSON file.
pub fn write_markers_json(path: &str, doc: &MarkerDocument, pretty: bool) -> Result<()> {
    debug!(path, markers = doc.markers.len(), "Writing marker JSON");
    fs::write(path, markers_json(doc, pretty)?)?;
    Ok(())
}

//! Time-of-day filtering and clock formatting.

use anyhow::{Context, Result, bail};
use chrono::{NaiveDateTime, Timelike};
use std::str::FromStr;

use crate::trips::Trip;

/// Half-width of the active window around the filter target, in minutes.
/// Inclusive on both ends, so the full window spans 121 minutes.
pub const WINDOW_MINUTES: i32 = 60;

/// A user-selected time-of-day restriction on the trip set.
///
/// Mirrors the slider domain `[-1, 1439]`: `-1` means no restriction, any
/// other value is a minute of the day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeFilter {
    /// No restriction; every trip is active.
    #[default]
    Any,
    /// A minute of the day in `[0, 1439]`.
    Minute(u16),
}

impl TimeFilter {
    /// Builds a filter from the raw slider integer.
    ///
    /// # Errors
    ///
    /// Returns an error for values outside `[-1, 1439]`.
    pub fn from_slider(value: i32) -> Result<Self> {
        match value {
            -1 => Ok(TimeFilter::Any),
            0..=1439 => Ok(TimeFilter::Minute(value as u16)),
            _ => bail!("slider value must be in [-1, 1439], got {value}"),
        }
    }

    /// The target minute of the day, or `None` when unfiltered.
    pub fn minute(&self) -> Option<u16> {
        match self {
            TimeFilter::Any => None,
            TimeFilter::Minute(value) => Some(*value),
        }
    }

    /// The display label shown next to the slider.
    pub fn label(&self) -> String {
        match self {
            TimeFilter::Any => "any time".to_string(),
            TimeFilter::Minute(value) => format_time(*value as u32),
        }
    }

    /// Whether a trip starts or ends within the window around the target.
    pub fn matches(&self, trip: &Trip) -> bool {
        match self {
            TimeFilter::Any => true,
            TimeFilter::Minute(target) => {
                let target = *target as i32;
                let started = minutes_since_midnight(&trip.started_at) as i32;
                let ended = minutes_since_midnight(&trip.ended_at) as i32;

                (started - target).abs() <= WINDOW_MINUTES
                    || (ended - target).abs() <= WINDOW_MINUTES
            }
        }
    }
}

/// Accepts `any`, a slider integer in `[-1, 1439]`, or a 24-hour `HH:MM`.
impl FromStr for TimeFilter {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();

        if s.eq_ignore_ascii_case("any") {
            return Ok(TimeFilter::Any);
        }

        if let Some((hours, minutes)) = s.split_once(':') {
            let hours: u32 = hours
                .parse()
                .with_context(|| format!("invalid hour in {s:?}"))?;
            let minutes: u32 = minutes
                .parse()
                .with_context(|| format!("invalid minute in {s:?}"))?;
            if hours > 23 || minutes > 59 {
                bail!("time of day out of range: {s:?}");
            }
            return Ok(TimeFilter::Minute((hours * 60 + minutes) as u16));
        }

        let value: i32 = s
            .parse()
            .with_context(|| format!("expected 'any', a minute value, or HH:MM, got {s:?}"))?;
        TimeFilter::from_slider(value)
    }
}

/// Minutes elapsed since midnight on the timestamp's own day. Seconds are
/// truncated, not rounded.
pub fn minutes_since_midnight(timestamp: &NaiveDateTime) -> u32 {
    timestamp.hour() * 60 + timestamp.minute()
}

/// Returns the trips active around the filter's time of day.
///
/// A trip is active when it starts or ends within [`WINDOW_MINUTES`] of the
/// target (inclusive, OR across the two endpoints). `TimeFilter::Any`
/// returns the input unchanged, same length and order.
///
/// Known limitation: the comparison is plain minute arithmetic with no
/// wraparound at midnight, so a trip at 23:50 is not considered close to a
/// filter at 00:10.
pub fn filter_trips(trips: &[Trip], filter: TimeFilter) -> Vec<Trip> {
    match filter {
        TimeFilter::Any => trips.to_vec(),
        TimeFilter::Minute(_) => trips
            .iter()
            .filter(|trip| filter.matches(trip))
            .cloned()
            .collect(),
    }
}

/// Formats a minute of the day on a 12-hour clock with AM/PM.
///
/// | Input | Output     |
/// |-------|------------|
/// | 0     | `12:00 AM` |
/// | 720   | `12:00 PM` |
/// | 845   | `2:05 PM`  |
pub fn format_time(minutes: u32) -> String {
    let hours = minutes / 60;
    let minutes = minutes % 60;
    let meridiem = if hours >= 12 { "PM" } else { "AM" };
    let hour12 = match hours % 12 {
        0 => 12,
        hour => hour,
    };
    format!("{hour12}:{minutes:02} {meridiem}")
}

//! Square-root radius scaling for station markers. Circle area, not
//! radius, tracks trip volume.

use crate::timeofday::TimeFilter;

/// Maps a trip total in `[0, domain_max]` to a pixel radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadiusScale {
    domain_max: f64,
    range_min: f64,
    range_max: f64,
}

impl RadiusScale {
    /// Range used when the whole trip set is shown.
    pub const UNFILTERED_RANGE: (f64, f64) = (0.0, 25.0);

    /// Wider range used under a time filter, where totals are smaller.
    pub const FILTERED_RANGE: (f64, f64) = (3.0, 50.0);

    pub fn unfiltered(domain_max: usize) -> Self {
        let (range_min, range_max) = Self::UNFILTERED_RANGE;
        Self {
            domain_max: domain_max as f64,
            range_min,
            range_max,
        }
    }

    pub fn filtered(domain_max: usize) -> Self {
        let (range_min, range_max) = Self::FILTERED_RANGE;
        Self {
            domain_max: domain_max as f64,
            range_min,
            range_max,
        }
    }

    /// Picks the range configuration matching the active filter state.
    pub fn for_filter(filter: TimeFilter, domain_max: usize) -> Self {
        match filter {
            TimeFilter::Any => Self::unfiltered(domain_max),
            TimeFilter::Minute(_) => Self::filtered(domain_max),
        }
    }

    /// The radius for a trip total.
    ///
    /// `radius = range_min + (range_max - range_min) * sqrt(value / domain_max)`,
    /// with zero values (or an empty domain) pinned to `range_min` and
    /// values beyond the domain clamped to `range_max`.
    pub fn radius(&self, value: usize) -> f64 {
        if self.domain_max <= 0.0 {
            return self.range_min;
        }
        let fraction = (value as f64 / self.domain_max).clamp(0.0, 1.0);
        self.range_min + (self.range_max - self.range_min) * fraction.sqrt()
    }
}

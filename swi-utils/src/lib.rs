//! Shared utility functions for SWI crates.

/// Coordinate helpers
pub mod geo {
    /// Approximate kilometres per degree of latitude.
    pub const KM_PER_DEG_LAT: f64 = 111.0;

    /// Approximate kilometres per degree of longitude around 35°N (Kansai).
    /// Regional constant; display only.
    pub const KM_PER_DEG_LON: f64 = 91.0;

    /// Which coordinate an interval is measured along.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum Axis {
        Latitude,
        Longitude,
    }

    /// Integer key for `value` rounded to `precision` (e.g. 1e-6 -> micro-degrees).
    ///
    /// Two values with the same key are considered the same interval.
    pub fn micro_key(value: f64, precision: f64) -> i64 {
        (value / precision).round() as i64
    }

    /// Round `value` to the nearest multiple of `precision`.
    pub fn round_to(value: f64, precision: f64) -> f64 {
        from_micro_key(micro_key(value, precision), precision)
    }

    /// Inverse of [`micro_key`].
    ///
    /// When `precision` is 1/N for a whole N the key is divided by N, so keys
    /// map back to the closest decimal (8000 keys at 1e-6 -> 0.008). Any
    /// other positive precision (0.25 is 1/4, 2.5 is not) multiplies instead.
    pub fn from_micro_key(key: i64, precision: f64) -> f64 {
        let steps = precision.recip();
        let whole = steps.round();
        if whole >= 1.0 && (steps - whole).abs() <= whole * 1e-9 {
            key as f64 / whole
        } else {
            key as f64 * precision
        }
    }

    /// Rough distance in km covered by `interval` degrees along `axis`.
    pub fn km_estimate(interval: f64, axis: Axis) -> f64 {
        match axis {
            Axis::Latitude => interval * KM_PER_DEG_LAT,
            Axis::Longitude => interval * KM_PER_DEG_LON,
        }
    }

}

/// Forecast time helpers
pub mod time {
    use crate::error::TimeError;
    use chrono::{DateTime, Duration, FixedOffset, NaiveDateTime, Utc};

    /// Japan Standard Time, UTC+9.
    pub fn jst() -> FixedOffset {
        // within the ±24h range east_opt accepts
        FixedOffset::east_opt(9 * 3600).unwrap()
    }

    /// Wall-clock time (JST) that forecast hour `ft` refers to.
    pub fn valid_time(initial: &DateTime<Utc>, ft: u32) -> DateTime<FixedOffset> {
        (*initial + Duration::hours(ft as i64)).with_timezone(&jst())
    }

    /// Label such as `"07/01 12:00 (FT3)"`.
    pub fn format_ft_label(initial: &DateTime<Utc>, ft: u32) -> String {
        format!("{} (FT{})", valid_time(initial, ft).format("%m/%d %H:%M"), ft)
    }

    /// Parse an ISO-8601 timestamp into UTC.
    ///
    /// Timestamps without an offset (`2023-06-30T15:00:00`) are taken as UTC,
    /// which is how the calculation service writes them.
    pub fn parse_initial_time(s: &str) -> Result<DateTime<Utc>, TimeError> {
        if let Ok(t) = DateTime::parse_from_rfc3339(s) {
            return Ok(t.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
            .map(|naive| naive.and_utc())
            .map_err(|e| TimeError(format!("{}: {}", s, e)))
    }

}

/// Error types
pub mod error {
    use std::fmt;

    #[derive(Debug)]
    pub struct TimeError(pub String);

    impl fmt::Display for TimeError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "Time error: {}", self.0)
        }
    }

    impl std::error::Error for TimeError {}
}

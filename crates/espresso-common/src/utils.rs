//! Small shared helpers: resample-width parsing and axis label formatting.

use chrono::Duration;

use crate::error::{EspressoError, Result};

/// Parses a resample width given as a duration string into a [`Duration`].
///
/// Accepts the offset aliases the assay tooling uses: `"30s"`, `"10min"`,
/// `"1h"` (also `sec`, `m`, `hr`). Fractional values are allowed.
///
/// # Errors
///
/// Returns [`EspressoError::Config`] for missing units, unparseable
/// numbers, unsupported units, or non-positive widths.
pub fn parse_resample_width(spec: &str) -> Result<Duration> {
    let trimmed = spec.trim();
    let unit_start = trimmed
        .find(|c: char| !c.is_ascii_digit() && c != '.')
        .ok_or_else(|| {
            EspressoError::Config(format!("resample width {spec:?} has no unit suffix"))
        })?;
    let (number, unit) = trimmed.split_at(unit_start);
    let value: f64 = number.parse().map_err(|_| {
        EspressoError::Config(format!("resample width {spec:?} has an invalid numeric part"))
    })?;
    let seconds = match unit.trim() {
        "s" | "sec" => value,
        "m" | "min" => value * 60.0,
        "h" | "hr" => value * 3600.0,
        other => {
            return Err(EspressoError::Config(format!(
                "unsupported resample unit {other:?} in {spec:?}"
            )))
        }
    };
    if seconds <= 0.0 {
        return Err(EspressoError::Config(format!(
            "resample width {spec:?} must be positive"
        )));
    }
    Ok(Duration::milliseconds((seconds * 1000.0).round() as i64))
}

/// Formats an elapsed-seconds tick value as hours for the time axis.
///
/// Whole hours render without a decimal point so hourly major ticks read
/// as "0, 1, 2, ...".
#[must_use]
pub fn format_hours(seconds: f64) -> String {
    let hours = seconds / 3600.0;
    if (hours - hours.round()).abs() < 1e-9 {
        format!("{}", hours.round() as i64)
    } else {
        format!("{hours:.1}")
    }
}

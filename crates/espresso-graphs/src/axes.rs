//! Time-axis formatting and shared-limit helpers applied to every panel.

use espresso_common::format_hours;

/// Number of major (hourly) x labels for a window, capped to stay legible.
#[must_use]
pub fn hour_label_count(min_s: f64, max_s: f64) -> usize {
    let hours = ((max_s - min_s) / 3600.0).ceil() as usize;
    (hours + 1).clamp(2, 13)
}

/// Formats an x tick value (elapsed seconds) as hours.
#[must_use]
pub fn x_label(seconds: &f64) -> String {
    format_hours(*seconds)
}

/// Guards a possibly-degenerate window so chart construction always
/// succeeds. An empty window collapses to a unit span.
#[must_use]
pub fn safe_range(min_s: f64, max_s: f64) -> (f64, f64) {
    if max_s > min_s {
        (min_s, max_s)
    } else {
        (min_s, min_s + 1.0)
    }
}

/// Shared y upper limit across panels: the maximum of `values` padded by
/// 5%, or 1.0 when there is nothing to show.
#[must_use]
pub fn padded_max(values: impl Iterator<Item = f64>) -> f64 {
    let max = values.fold(0.0_f64, f64::max);
    if max > 0.0 {
        max * 1.05
    } else {
        1.0
    }
}

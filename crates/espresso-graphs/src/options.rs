//! Caller-facing plot options: explicit structs with named fields and
//! documented defaults, validated at the public entry points.

use espresso_common::{parse_resample_width, EspressoError, FeedTable, Result};
use serde::{Deserialize, Serialize};

use crate::munge::check_facets;

/// Grouping column used when none is given.
pub const DEFAULT_GROUP_BY: &str = "Genotype";
/// Coloring column used when none is given.
pub const DEFAULT_COLOR_BY: &str = "FoodChoice";

/// Canvas pixel budget for a single rendered figure. Keeps framebuffer
/// allocations bounded; at 3 bytes per pixel this is a 192 MiB buffer.
pub(crate) const MAX_CANVAS_PIXELS: u64 = 64 * 1024 * 1024;

/// Options for the timecourse area plot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimecourseOptions {
    /// Categorical column that tiles the figure into panels, one per
    /// value. `None` means `"Genotype"`.
    pub group_by: Option<String>,
    /// Categorical column that stacks and colors each panel.
    /// `None` means `"FoodChoice"`.
    pub color_by: Option<String>,
    /// Time-bucket width as a duration string. Default `"10min"`.
    pub resample_by: String,
    /// Explicit figure size as a (width, height) pixel pair. `None`
    /// scales the width by panel count at a fixed height.
    pub fig_size: Option<(u32, u32)>,
    /// Draw vertical gridlines at major (hourly) ticks. Default `true`.
    pub gridlines_major: bool,
    /// Draw vertical gridlines at minor ticks. Default `true`.
    pub gridlines_minor: bool,
}

impl Default for TimecourseOptions {
    fn default() -> Self {
        Self {
            group_by: None,
            color_by: None,
            resample_by: "10min".to_string(),
            fig_size: None,
            gridlines_major: true,
            gridlines_minor: true,
        }
    }
}

/// Validated timecourse parameters.
#[derive(Debug)]
pub(crate) struct ResolvedTimecourse {
    pub group_by: String,
    pub color_by: String,
    pub width_s: f64,
}

impl TimecourseOptions {
    /// Applies the `None`-means-default convention and validates
    /// everything else before any computation runs.
    pub(crate) fn resolve(&self, table: &FeedTable) -> Result<ResolvedTimecourse> {
        if let Some((w, h)) = self.fig_size {
            if w == 0 || h == 0 {
                return Err(EspressoError::Config(format!(
                    "fig_size must be a positive (width, height) pair in pixels, got ({w}, {h})"
                )));
            }
            if u64::from(w) * u64::from(h) > MAX_CANVAS_PIXELS {
                return Err(EspressoError::Config(format!(
                    "fig_size ({w}, {h}) exceeds the canvas budget of {MAX_CANVAS_PIXELS} pixels"
                )));
            }
        }
        let group_by = match &self.group_by {
            Some(name) => {
                table.check_column(name)?;
                name.clone()
            }
            None => DEFAULT_GROUP_BY.to_string(),
        };
        let color_by = match &self.color_by {
            Some(name) => {
                table.check_column(name)?;
                name.clone()
            }
            None => DEFAULT_COLOR_BY.to_string(),
        };
        let width_s = parse_resample_width(&self.resample_by)?.num_milliseconds() as f64 / 1000.0;
        Ok(ResolvedTimecourse {
            group_by,
            color_by,
            width_s,
        })
    }
}

/// Which cumulative quantity a line tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CumulativeMetric {
    /// Running volume total, microliters.
    Volume,
    /// Running bout-count total.
    FeedCount,
}

impl CumulativeMetric {
    /// Axis label for the metric.
    #[must_use]
    pub const fn axis_label(self) -> &'static str {
        match self {
            Self::Volume => "Cumulative volume (µl)",
            Self::FeedCount => "Cumulative feed count",
        }
    }
}

/// Options for the cumulative line plots.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CumulativeOptions {
    /// Categorical column faceting panel rows. `None` collapses the row
    /// dimension.
    pub row: Option<String>,
    /// Categorical column faceting panel columns. `None` collapses the
    /// column dimension.
    pub col: Option<String>,
    /// Categorical column drawn as one line (plus confidence band) per
    /// value. `None` means `"FoodChoice"`.
    pub color_by: Option<String>,
    /// Window start, hours. Default 0.
    pub start_hour: f64,
    /// Window end, hours. `None` means the experiment duration.
    pub end_hour: Option<f64>,
    /// Explicit y-limits. `None` floors at zero and follows the data.
    pub ylim: Option<(f64, f64)>,
    /// Palette override as RGB triples, one per hue value, cycled.
    pub palette: Option<Vec<(u8, u8, u8)>>,
    /// Time-bucket width as a duration string. Default `"5min"`.
    pub resample_by: String,
    /// Width of each panel in pixels. Default 600.
    pub panel_width: u32,
    /// Height of each panel in pixels. Default 600.
    pub panel_height: u32,
    /// Draw vertical gridlines at major (hourly) ticks. Default `true`.
    pub gridlines: bool,
}

impl Default for CumulativeOptions {
    fn default() -> Self {
        Self {
            row: None,
            col: None,
            color_by: None,
            start_hour: 0.0,
            end_hour: None,
            ylim: None,
            palette: None,
            resample_by: "5min".to_string(),
            panel_width: 600,
            panel_height: 600,
            gridlines: true,
        }
    }
}

/// Validated cumulative parameters, window already in seconds.
#[derive(Debug)]
pub(crate) struct ResolvedCumulative {
    pub row: Option<String>,
    pub col: Option<String>,
    pub color_by: String,
    pub width_s: f64,
    pub min_time_s: f64,
    pub max_time_s: f64,
    pub ylim: Option<(f64, f64)>,
}

impl CumulativeOptions {
    /// Validates facet/hue columns and window parameters. A window with
    /// `start_hour > end_hour` is allowed and simply selects nothing.
    pub(crate) fn resolve(
        &self,
        table: &FeedTable,
        expt_duration_min: f64,
    ) -> Result<ResolvedCumulative> {
        if self.panel_width == 0 || self.panel_height == 0 {
            return Err(EspressoError::Config(format!(
                "panel size must be a positive (width, height) pair in pixels, got ({}, {})",
                self.panel_width, self.panel_height
            )));
        }
        if u64::from(self.panel_width) * u64::from(self.panel_height) > MAX_CANVAS_PIXELS {
            return Err(EspressoError::Config(format!(
                "panel size ({}, {}) exceeds the canvas budget of {MAX_CANVAS_PIXELS} pixels",
                self.panel_width, self.panel_height
            )));
        }
        if self.start_hour < 0.0 {
            return Err(EspressoError::Config(format!(
                "start_hour must be non-negative, got {}",
                self.start_hour
            )));
        }
        if let Some((lo, hi)) = self.ylim {
            if hi < lo {
                return Err(EspressoError::Config(format!(
                    "ylim must be an ascending (low, high) pair, got ({lo}, {hi})"
                )));
            }
        }
        let color_by = self
            .color_by
            .clone()
            .unwrap_or_else(|| DEFAULT_COLOR_BY.to_string());
        check_facets(self.row.as_deref(), self.col.as_deref(), &color_by, table)?;

        let end_hour = self.end_hour.unwrap_or(expt_duration_min / 60.0);
        let width_s = parse_resample_width(&self.resample_by)?.num_milliseconds() as f64 / 1000.0;
        Ok(ResolvedCumulative {
            row: self.row.clone(),
            col: self.col.clone(),
            color_by,
            width_s,
            min_time_s: self.start_hour * 3600.0,
            max_time_s: end_hour * 3600.0,
            ylim: self.ylim,
        })
    }
}

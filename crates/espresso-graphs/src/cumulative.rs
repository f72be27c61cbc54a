//! Cumulative line plots with 95% confidence bands, faceted by row and
//! column keys and colored by a hue key.

use std::collections::BTreeMap;

use espresso_common::{EspressoError, Experiment, FeedTable, Result};
use plotters::prelude::*;
use plotters_bitmap::BitMapBackend;
use tracing::debug;

use crate::axes;
use crate::figure::{encode_png, FacetGrid};
use crate::munge::{self, CumulativePoint};
use crate::options::{CumulativeMetric, CumulativeOptions, MAX_CANVAS_PIXELS};
use crate::style::PlotStyle;
use crate::traits::ChartRenderer;

/// Cumulative plotting facade over an espresso experiment.
#[derive(Debug, Clone)]
pub struct CumulativePlotter {
    feeds: FeedTable,
    expt_duration_min: f64,
}

/// Mean and confidence half-width across replicate series at one bucket.
#[derive(Debug, Clone, PartialEq)]
struct BandPoint {
    time_s: f64,
    mean: f64,
    ci: f64,
}

impl CumulativePlotter {
    /// Creates a plotter over a defensive copy of the experiment's feeds.
    #[must_use]
    pub fn new(experiment: &Experiment) -> Self {
        Self {
            feeds: experiment.feeds().clone(),
            expt_duration_min: experiment.expt_duration_min(),
        }
    }

    /// Renders the cumulative volume consumed per fly, one line per hue
    /// value with a 95% confidence band across replicate flies, faceted
    /// by the `row` and `col` keys.
    ///
    /// # Errors
    ///
    /// Configuration and unknown-column errors surface before any
    /// rendering; drawing failures surface as render errors.
    pub fn consumption(&self, opts: &CumulativeOptions) -> Result<FacetGrid> {
        self.render_cumulative(CumulativeMetric::Volume, opts)
    }

    /// Renders the cumulative feed count per fly, same layout as
    /// [`Self::consumption`].
    ///
    /// # Errors
    ///
    /// Same taxonomy as [`Self::consumption`].
    pub fn feed_count(&self, opts: &CumulativeOptions) -> Result<FacetGrid> {
        self.render_cumulative(CumulativeMetric::FeedCount, opts)
    }

    fn render_cumulative(
        &self,
        metric: CumulativeMetric,
        opts: &CumulativeOptions,
    ) -> Result<FacetGrid> {
        let resolved = opts.resolve(&self.feeds, self.expt_duration_min)?;

        // Key layout: [row?, col?, hue, fly]. Replicates are per fly.
        let mut keys: Vec<&str> = Vec::new();
        let row_idx = resolved.row.as_deref().map(|r| {
            keys.push(r);
            keys.len() - 1
        });
        let col_idx = resolved.col.as_deref().map(|c| {
            keys.push(c);
            keys.len() - 1
        });
        let hue_idx = keys.len();
        keys.push(&resolved.color_by);
        keys.push("FlyId");

        let bins = munge::groupby_resamp_sum(&self.feeds, &keys, resolved.width_s)?;
        let mut points = munge::cumsum_for_cumulative(&bins);
        points.retain(|p| p.time_s >= resolved.min_time_s && p.time_s <= resolved.max_time_s);

        let mut rows = facet_values(&points, row_idx);
        let mut cols = facet_values(&points, col_idx);
        // An empty window still renders a (single, empty) panel.
        if rows.is_empty() {
            rows.push(String::new());
        }
        if cols.is_empty() {
            cols.push(String::new());
        }
        let hues = facet_values(&points, Some(hue_idx));

        let style = opts
            .palette
            .as_deref()
            .map_or_else(PlotStyle::default, PlotStyle::with_palette);

        // Band series per panel per hue, computed before the charts so
        // every panel can share the same y range.
        let mut panel_series: Vec<Vec<(usize, Vec<BandPoint>)>> = Vec::new();
        for row_val in &rows {
            for col_val in &cols {
                let mut per_hue = Vec::new();
                for (h, hue) in hues.iter().enumerate() {
                    let series = band_series(
                        &points,
                        (row_idx, row_val),
                        (col_idx, col_val),
                        (hue_idx, hue),
                        metric,
                    );
                    if !series.is_empty() {
                        per_hue.push((h, series));
                    }
                }
                panel_series.push(per_hue);
            }
        }

        // Cumulative quantities cannot be negative: the lower bound is
        // zero unless explicitly overridden.
        let (y_lo, y_hi) = resolved.ylim.unwrap_or_else(|| {
            let upper = axes::padded_max(
                panel_series
                    .iter()
                    .flatten()
                    .flat_map(|(_, series)| series.iter().map(|b| b.mean + b.ci)),
            );
            (0.0, upper)
        });
        let (x_lo, x_hi) = axes::safe_range(resolved.min_time_s, resolved.max_time_s);

        let grid_width = u64::from(opts.panel_width) * cols.len() as u64;
        let grid_height = u64::from(opts.panel_height) * rows.len() as u64;
        if grid_width * grid_height > MAX_CANVAS_PIXELS {
            return Err(EspressoError::Config(format!(
                "facet grid of {} x {} panels at ({}, {}) pixels each exceeds the canvas budget",
                rows.len(),
                cols.len(),
                opts.panel_width,
                opts.panel_height
            )));
        }
        let (width, height) = (grid_width as u32, grid_height as u32);
        let mut buffer = vec![0_u8; width as usize * height as usize * 3];
        {
            let root =
                BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
            root.fill(&style.background)?;
            let tiles = root.split_evenly((rows.len(), cols.len()));

            for (r, row_val) in rows.iter().enumerate() {
                for (c, col_val) in cols.iter().enumerate() {
                    let tile = &tiles[r * cols.len() + c];
                    let title = panel_title(
                        resolved.row.as_deref(),
                        row_val,
                        resolved.col.as_deref(),
                        col_val,
                    );

                    let mut builder = ChartBuilder::on(tile);
                    builder
                        .margin(10)
                        .set_label_area_size(LabelAreaPosition::Left, 60)
                        .set_label_area_size(LabelAreaPosition::Bottom, 50);
                    if !title.is_empty() {
                        builder.caption(&title, ("sans-serif", 24));
                    }
                    let mut chart = builder.build_cartesian_2d(x_lo..x_hi, y_lo..y_hi)?;

                    let mut mesh = chart.configure_mesh();
                    mesh.disable_y_mesh()
                        .x_labels(axes::hour_label_count(x_lo, x_hi))
                        .x_label_formatter(&axes::x_label)
                        .x_desc("Time (h)")
                        .y_desc(metric.axis_label())
                        .axis_desc_style(("sans-serif", 20));
                    if opts.gridlines {
                        mesh.bold_line_style(&BLACK.mix(0.25));
                    } else {
                        mesh.bold_line_style(&TRANSPARENT);
                    }
                    mesh.light_line_style(&TRANSPARENT);
                    mesh.draw()?;

                    for (h, series) in &panel_series[r * cols.len() + c] {
                        let color = style.color(*h);

                        let band: Vec<(f64, f64)> = series
                            .iter()
                            .map(|b| (b.time_s, b.mean + b.ci))
                            .chain(
                                series
                                    .iter()
                                    .rev()
                                    .map(|b| (b.time_s, (b.mean - b.ci).max(0.0))),
                            )
                            .collect();
                        chart.draw_series(std::iter::once(Polygon::new(
                            band,
                            color.mix(style.band_alpha),
                        )))?;

                        let anno = chart.draw_series(LineSeries::new(
                            series.iter().map(|b| (b.time_s, b.mean)),
                            color.stroke_width(2),
                        ))?;
                        // One shared legend, drawn on the first panel.
                        if r == 0 && c == 0 {
                            anno.label(hues[*h].as_str()).legend(move |(x, y)| {
                                PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
                            });
                        }
                    }

                    if r == 0 && c == 0 && !panel_series[0].is_empty() {
                        chart
                            .configure_series_labels()
                            .border_style(&BLACK.mix(0.3))
                            .background_style(&style.background.mix(0.8))
                            .draw()?;
                    }
                }
            }
            root.present()?;
        }

        let png = encode_png(&buffer, width, height)?;
        let legend = hues
            .iter()
            .enumerate()
            .map(|(h, hue)| {
                let color = style.color(h);
                (hue.clone(), (color.0, color.1, color.2))
            })
            .collect();
        debug!(
            rows = rows.len(),
            cols = cols.len(),
            hues = hues.len(),
            ?metric,
            "rendered cumulative facet grid"
        );
        Ok(FacetGrid {
            png,
            width,
            height,
            rows,
            cols,
            legend,
        })
    }
}

/// Sorted distinct values of one key position. An absent key collapses
/// to a single unlabeled slot; a present key with no surviving points
/// yields no values.
fn facet_values(points: &[CumulativePoint], idx: Option<usize>) -> Vec<String> {
    let Some(idx) = idx else {
        // Absent key: the dimension collapses to a single unlabeled slot.
        return vec![String::new()];
    };
    let mut values: Vec<String> = points
        .iter()
        .filter_map(|p| p.keys.get(idx).cloned())
        .collect();
    values.sort();
    values.dedup();
    values
}

/// Panel title naming only the facet dimensions that are present.
fn panel_title(
    row_key: Option<&str>,
    row_val: &str,
    col_key: Option<&str>,
    col_val: &str,
) -> String {
    match (row_key, col_key) {
        (None, Some(col)) => format!("{col} = {col_val}"),
        (Some(row), None) => format!("{row} = {row_val}"),
        (Some(row), Some(col)) => format!("{row} = {row_val}, {col} = {col_val}"),
        (None, None) => String::new(),
    }
}

/// Mean and 95% confidence half-width per bucket across the replicate
/// (per-fly) series matching one panel/hue selection. Identical
/// replicates produce a zero-width band.
fn band_series(
    points: &[CumulativePoint],
    row: (Option<usize>, &str),
    col: (Option<usize>, &str),
    hue: (usize, &str),
    metric: CumulativeMetric,
) -> Vec<BandPoint> {
    let mut by_time: BTreeMap<i64, Vec<f64>> = BTreeMap::new();
    for p in points {
        if !row.0.map_or(true, |i| p.keys[i] == row.1) {
            continue;
        }
        if !col.0.map_or(true, |i| p.keys[i] == col.1) {
            continue;
        }
        if p.keys.get(hue.0).map(String::as_str) != Some(hue.1) {
            continue;
        }
        let value = match metric {
            CumulativeMetric::Volume => p.cumulative_ul,
            CumulativeMetric::FeedCount => f64::from(p.cumulative_count),
        };
        by_time
            .entry((p.time_s * 1000.0).round() as i64)
            .or_default()
            .push(value);
    }
    by_time
        .into_iter()
        .map(|(ms, values)| {
            let n = values.len() as f64;
            let mean = values.iter().sum::<f64>() / n;
            let ci = if values.len() > 1 {
                let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
                1.96 * (var / n).sqrt()
            } else {
                0.0
            };
            BandPoint {
                time_s: ms as f64 / 1000.0,
                mean,
                ci,
            }
        })
        .collect()
}

impl ChartRenderer for CumulativePlotter {
    type Options = CumulativeOptions;

    fn render(&self, options: &Self::Options) -> Result<Vec<u8>> {
        Ok(self.consumption(options)?.png)
    }

    fn name(&self) -> &'static str {
        "cumulative_consumption"
    }

    fn description(&self) -> &'static str {
        "Cumulative volume per fly with 95% confidence bands, faceted grid"
    }
}

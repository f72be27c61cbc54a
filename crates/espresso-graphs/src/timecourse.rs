//! Timecourse area plots: stacked feed volume over elapsed time, tiled
//! into one panel per group value.

use espresso_common::{Experiment, FeedTable, Result};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters_bitmap::BitMapBackend;
use tracing::debug;

use crate::axes;
use crate::figure::{encode_png, Figure};
use crate::munge::{self, WideTable};
use crate::options::{ResolvedTimecourse, TimecourseOptions};
use crate::style::PlotStyle;
use crate::traits::ChartRenderer;

/// Default per-panel width in pixels; total width scales with panel count.
const PANEL_WIDTH_PX: u32 = 1000;
/// Default figure height in pixels.
const PANEL_HEIGHT_PX: u32 = 700;

/// Timecourse plotting facade over an espresso experiment.
#[derive(Debug, Clone)]
pub struct TimecoursePlotter {
    feeds: FeedTable,
}

/// Prepared panel inputs: one wide table per group value plus the shared
/// axis limits.
struct PanelData {
    groups: Vec<String>,
    tables: Vec<WideTable>,
    x_max: f64,
    y_max: f64,
}

impl TimecoursePlotter {
    /// Creates a plotter over a defensive copy of the experiment's feeds.
    #[must_use]
    pub fn new(experiment: &Experiment) -> Self {
        Self {
            feeds: experiment.feeds().clone(),
        }
    }

    /// Renders a timecourse area figure of feed volume for the entire
    /// assay: one panel per `group_by` value, stacked and colored by
    /// `color_by`, volumes binned by `resample_by`.
    ///
    /// # Errors
    ///
    /// Configuration and unknown-column errors surface before any
    /// rendering; drawing failures surface as render errors.
    pub fn feed_volume(&self, opts: &TimecourseOptions) -> Result<Figure> {
        let resolved = opts.resolve(&self.feeds)?;
        let panels = self.panel_data(&resolved)?;

        let (width, height) = opts.fig_size.unwrap_or_else(|| {
            (
                PANEL_WIDTH_PX * panels.groups.len().max(1) as u32,
                PANEL_HEIGHT_PX,
            )
        });
        let mut buffer = vec![0_u8; width as usize * height as usize * 3];
        {
            let root =
                BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
            Self::draw(&root, &panels, opts, &PlotStyle::default())?;
            root.present()?;
        }
        let png = encode_png(&buffer, width, height)?;
        debug!(
            panels = panels.groups.len(),
            width, height, "rendered timecourse figure"
        );
        Ok(Figure {
            png,
            width,
            height,
            panels: panels.groups,
        })
    }

    /// Draws the same panels into a caller-supplied drawing area, for
    /// composition into a larger canvas. No figure is created or
    /// returned; the caller keeps ownership of the backend.
    ///
    /// # Errors
    ///
    /// Same taxonomy as [`Self::feed_volume`].
    pub fn feed_volume_on<DB: DrawingBackend>(
        &self,
        area: &DrawingArea<DB, Shift>,
        opts: &TimecourseOptions,
    ) -> Result<()>
    where
        DB::ErrorType: 'static,
    {
        let resolved = opts.resolve(&self.feeds)?;
        let panels = self.panel_data(&resolved)?;
        Self::draw(area, &panels, opts, &PlotStyle::default())
    }

    /// Runs the shared pipeline (resample, pivot per group) and computes
    /// the axis limits every panel shares.
    fn panel_data(&self, resolved: &ResolvedTimecourse) -> Result<PanelData> {
        let bins = munge::groupby_resamp_sum(
            &self.feeds,
            &[&resolved.group_by, &resolved.color_by],
            resolved.width_s,
        )?;

        let mut groups: Vec<String> = bins
            .iter()
            .filter_map(|b| b.keys.first().cloned())
            .collect();
        groups.sort();
        groups.dedup();

        let tables: Vec<WideTable> = groups.iter().map(|g| munge::pivot_wide(&bins, g)).collect();

        // Shared limits keep the panels visually comparable.
        let x_max = bins
            .iter()
            .map(|b| b.time_s)
            .fold(0.0_f64, f64::max)
            + resolved.width_s;
        let y_max = axes::padded_max(tables.iter().flat_map(|t| {
            (0..t.times.len()).map(move |i| t.values.iter().map(|col| col[i]).sum::<f64>())
        }));

        Ok(PanelData {
            groups,
            tables,
            x_max,
            y_max,
        })
    }

    fn draw<DB: DrawingBackend>(
        area: &DrawingArea<DB, Shift>,
        panels: &PanelData,
        opts: &TimecourseOptions,
        style: &PlotStyle,
    ) -> Result<()>
    where
        DB::ErrorType: 'static,
    {
        area.fill(&style.background)?;
        if panels.groups.is_empty() {
            return Ok(());
        }

        let tiles = area.split_evenly((1, panels.groups.len()));
        for ((group, table), tile) in panels.groups.iter().zip(&panels.tables).zip(&tiles) {
            let mut chart = ChartBuilder::on(tile)
                .margin(10)
                .caption(group, ("sans-serif", 28))
                .set_label_area_size(LabelAreaPosition::Left, 60)
                .set_label_area_size(LabelAreaPosition::Bottom, 50)
                .build_cartesian_2d(0.0..panels.x_max, 0.0..panels.y_max)?;

            let mut mesh = chart.configure_mesh();
            mesh.disable_y_mesh()
                .x_labels(axes::hour_label_count(0.0, panels.x_max))
                .x_label_formatter(&axes::x_label)
                .x_desc("Time (h)")
                .y_desc("Feed volume (µl)")
                .axis_desc_style(("sans-serif", 20));
            if opts.gridlines_major {
                mesh.bold_line_style(&BLACK.mix(0.25));
            } else {
                mesh.bold_line_style(&TRANSPARENT);
            }
            if opts.gridlines_minor {
                mesh.light_line_style(&BLACK.mix(0.1));
            } else {
                mesh.light_line_style(&TRANSPARENT);
            }
            mesh.draw()?;

            // Running stack totals, bottom category first.
            let mut stacks: Vec<Vec<f64>> = Vec::with_capacity(table.columns.len());
            let mut running = vec![0.0_f64; table.times.len()];
            for column in &table.values {
                for (acc, v) in running.iter_mut().zip(column) {
                    *acc += v;
                }
                stacks.push(running.clone());
            }

            // Tallest stack goes down first so lower layers repaint over it.
            for k in (0..table.columns.len()).rev() {
                let color = style.color(k);
                let series = table
                    .times
                    .iter()
                    .zip(&stacks[k])
                    .map(|(&t, &v)| (t, v));
                chart
                    .draw_series(
                        AreaSeries::new(series, 0.0, color.mix(style.area_alpha))
                            .border_style(color.stroke_width(1)),
                    )?
                    .label(table.columns[k].as_str())
                    .legend(move |(x, y)| {
                        Rectangle::new([(x, y - 6), (x + 12, y + 6)], color.filled())
                    });
            }

            chart
                .configure_series_labels()
                .border_style(&BLACK.mix(0.3))
                .background_style(&style.background.mix(0.8))
                .draw()?;
        }
        Ok(())
    }
}

impl ChartRenderer for TimecoursePlotter {
    type Options = TimecourseOptions;

    fn render(&self, options: &Self::Options) -> Result<Vec<u8>> {
        Ok(self.feed_volume(options)?.png)
    }

    fn name(&self) -> &'static str {
        "feed_volume_timecourse"
    }

    fn description(&self) -> &'static str {
        "Stacked feed volume over elapsed time, one panel per group value"
    }
}

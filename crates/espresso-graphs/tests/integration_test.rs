//! Integration tests for espresso-graphs.
//!
//! These exercise the two public renderers end to end over canned
//! feeding-assay datasets.

use espresso_common::test_utils::{feed_fixtures, init_test_logging};
use espresso_common::EspressoError;
use espresso_graphs::{
    ChartRenderer, CumulativeOptions, CumulativePlotter, TimecourseOptions, TimecoursePlotter,
};

const PNG_MAGIC: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

#[test]
fn timecourse_renders_one_panel_per_genotype() {
    init_test_logging();
    let experiment = feed_fixtures::two_genotype_experiment();
    let plotter = TimecoursePlotter::new(&experiment);

    let figure = plotter.feed_volume(&TimecourseOptions::default()).unwrap();

    assert_eq!(figure.panels, ["Orco-GAL4", "w1118"]);
    // Default width scales with the panel count.
    assert_eq!((figure.width, figure.height), (2000, 700));
    assert_eq!(&figure.png[..8], &PNG_MAGIC);
}

#[test]
fn timecourse_honors_an_explicit_figure_size() {
    let experiment = feed_fixtures::two_genotype_experiment();
    let plotter = TimecoursePlotter::new(&experiment);

    let opts = TimecourseOptions {
        fig_size: Some((640, 480)),
        ..TimecourseOptions::default()
    };
    let figure = plotter.feed_volume(&opts).unwrap();
    assert_eq!((figure.width, figure.height), (640, 480));
}

#[test]
fn timecourse_rejects_unknown_columns_before_rendering() {
    let experiment = feed_fixtures::two_genotype_experiment();
    let plotter = TimecoursePlotter::new(&experiment);

    let opts = TimecourseOptions {
        group_by: Some("Flavor".to_string()),
        ..TimecourseOptions::default()
    };
    let err = plotter.feed_volume(&opts).unwrap_err();
    assert!(matches!(err, EspressoError::UnknownColumn(name) if name == "Flavor"));
}

#[test]
fn timecourse_rejects_degenerate_figure_sizes() {
    let experiment = feed_fixtures::two_genotype_experiment();
    let plotter = TimecoursePlotter::new(&experiment);

    let opts = TimecourseOptions {
        fig_size: Some((800, 0)),
        ..TimecourseOptions::default()
    };
    assert!(matches!(
        plotter.feed_volume(&opts),
        Err(EspressoError::Config(_))
    ));
}

#[test]
fn timecourse_rejects_oversized_figure_sizes_without_panicking() {
    let experiment = feed_fixtures::two_genotype_experiment();
    let plotter = TimecoursePlotter::new(&experiment);

    // Positive but far beyond any allocatable framebuffer.
    let opts = TimecourseOptions {
        fig_size: Some((70_000, 70_000)),
        ..TimecourseOptions::default()
    };
    assert!(matches!(
        plotter.feed_volume(&opts),
        Err(EspressoError::Config(_))
    ));
}

#[test]
fn timecourse_of_an_empty_experiment_is_a_blank_figure() {
    let experiment = feed_fixtures::empty_experiment();
    let plotter = TimecoursePlotter::new(&experiment);

    let figure = plotter.feed_volume(&TimecourseOptions::default()).unwrap();
    assert!(figure.panels.is_empty());
    assert_eq!(&figure.png[..8], &PNG_MAGIC);
}

#[test]
fn cumulative_grid_facets_by_row_and_hues_by_food_choice() {
    init_test_logging();
    let experiment = feed_fixtures::two_genotype_experiment();
    let plotter = CumulativePlotter::new(&experiment);

    let opts = CumulativeOptions {
        row: Some("Genotype".to_string()),
        ..CumulativeOptions::default()
    };
    let grid = plotter.consumption(&opts).unwrap();

    assert_eq!(grid.rows, ["Orco-GAL4", "w1118"]);
    assert_eq!(grid.cols, [String::new()]);
    let hues: Vec<&str> = grid.legend.iter().map(|(h, _)| h.as_str()).collect();
    assert_eq!(hues, ["AppleJuice", "Water"]);
    // Two stacked panels at the default panel height.
    assert_eq!((grid.width, grid.height), (600, 1200));
    assert_eq!(&grid.png[..8], &PNG_MAGIC);
}

#[test]
fn cumulative_grid_supports_both_facet_dimensions() {
    let experiment = feed_fixtures::two_genotype_experiment();
    let plotter = CumulativePlotter::new(&experiment);

    let opts = CumulativeOptions {
        row: Some("Status".to_string()),
        col: Some("Genotype".to_string()),
        ..CumulativeOptions::default()
    };
    let grid = plotter.consumption(&opts).unwrap();
    assert_eq!(grid.rows, ["Test"]);
    assert_eq!(grid.cols, ["Orco-GAL4", "w1118"]);
}

#[test]
fn identical_replicates_still_render_a_full_grid() {
    // The zero-variance case: the band collapses but nothing fails.
    let experiment = feed_fixtures::identical_replicates_experiment(4);
    let plotter = CumulativePlotter::new(&experiment);

    let grid = plotter.consumption(&CumulativeOptions::default()).unwrap();
    assert_eq!(grid.legend.len(), 1);
    assert_eq!(grid.legend[0].0, "AppleJuice");
    assert_eq!(&grid.png[..8], &PNG_MAGIC);
}

#[test]
fn inverted_time_window_yields_an_empty_panel_not_an_error() {
    let experiment = feed_fixtures::two_genotype_experiment();
    let plotter = CumulativePlotter::new(&experiment);

    let opts = CumulativeOptions {
        start_hour: 5.0,
        end_hour: Some(3.0),
        ..CumulativeOptions::default()
    };
    let grid = plotter.consumption(&opts).unwrap();

    assert_eq!(grid.rows, [String::new()]);
    assert_eq!(grid.cols, [String::new()]);
    assert!(grid.legend.is_empty());
    assert_eq!(&grid.png[..8], &PNG_MAGIC);
}

#[test]
fn feed_count_uses_the_same_surface_as_consumption() {
    let experiment = feed_fixtures::two_genotype_experiment();
    let plotter = CumulativePlotter::new(&experiment);

    let opts = CumulativeOptions {
        col: Some("Genotype".to_string()),
        resample_by: "10min".to_string(),
        ..CumulativeOptions::default()
    };
    let grid = plotter.feed_count(&opts).unwrap();
    assert_eq!(grid.cols, ["Orco-GAL4", "w1118"]);
    assert_eq!(&grid.png[..8], &PNG_MAGIC);
}

#[test]
fn cumulative_rejects_unknown_facet_columns() {
    let experiment = feed_fixtures::two_genotype_experiment();
    let plotter = CumulativePlotter::new(&experiment);

    let opts = CumulativeOptions {
        col: Some("Region".to_string()),
        ..CumulativeOptions::default()
    };
    assert!(matches!(
        plotter.consumption(&opts),
        Err(EspressoError::UnknownColumn(name)) if name == "Region"
    ));
}

#[test]
fn renderers_expose_the_chart_renderer_trait() {
    let experiment = feed_fixtures::two_genotype_experiment();

    let timecourse = TimecoursePlotter::new(&experiment);
    assert_eq!(timecourse.name(), "feed_volume_timecourse");
    let png = timecourse.render(&TimecourseOptions::default()).unwrap();
    assert_eq!(&png[..8], &PNG_MAGIC);

    let cumulative = CumulativePlotter::new(&experiment);
    assert_eq!(cumulative.name(), "cumulative_consumption");
    assert!(!cumulative.description().is_empty());
    let png = cumulative.render(&CumulativeOptions::default()).unwrap();
    assert_eq!(&png[..8], &PNG_MAGIC);
}

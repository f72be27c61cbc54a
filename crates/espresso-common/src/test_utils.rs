//! Test utilities and shared fixtures for the espresso plotting workspace.
//!
//! This module provides logging setup, assertion helpers, and canned
//! feed-event datasets used across crates for unit and integration testing.

use std::sync::Once;

#[cfg(feature = "tracing-subscriber")]
use tracing_subscriber::{fmt, EnvFilter};

/// Initialize test logging once per test run.
static INIT: Once = Once::new();

/// Initialize logging for tests with a sensible default configuration.
/// This function is safe to call multiple times and will only initialize once.
#[cfg(feature = "tracing-subscriber")]
pub fn init_test_logging() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

        fmt().with_test_writer().with_env_filter(filter).init();
    });
}

/// No-op version when tracing-subscriber is not available
#[cfg(not(feature = "tracing-subscriber"))]
pub fn init_test_logging() {
    INIT.call_once(|| {});
}

/// Assert that two floating point numbers are approximately equal within a tolerance.
pub fn assert_approx_eq(left: f64, right: f64, tolerance: f64) {
    let diff = (left - right).abs();
    assert!(
        diff <= tolerance,
        "assertion failed: `{left}` is not approximately equal to `{right}` (tolerance: {tolerance}, diff: {diff})"
    );
}

/// Canned feed-event datasets for plotting tests.
pub mod feed_fixtures {
    use crate::types::{Experiment, FeedEvent, FeedTable};

    /// A single feeding bout with the boilerplate fields filled in.
    pub fn bout(
        genotype: &str,
        food_choice: &str,
        fly_id: &str,
        time_s: f64,
        volume_ul: f64,
    ) -> FeedEvent {
        FeedEvent {
            genotype: genotype.to_string(),
            food_choice: food_choice.to_string(),
            status: "Test".to_string(),
            temperature: "22C".to_string(),
            fly_id: fly_id.to_string(),
            time_s,
            duration_s: 5.0,
            volume_ul,
        }
    }

    /// Two genotypes, two food choices, bouts spread over a 2 h assay.
    ///
    /// Volumes sum to exactly 100 µl per genotype: ten 8 µl bouts on
    /// apple juice plus four 5 µl bouts on water.
    pub fn two_genotype_experiment() -> Experiment {
        let mut events = Vec::new();
        for (genotype, prefix) in [("w1118", "w"), ("Orco-GAL4", "o")] {
            for i in 0..10u32 {
                let fly = format!("{prefix}{}", i % 2);
                events.push(bout(
                    genotype,
                    "AppleJuice",
                    &fly,
                    300.0 + 300.0 * f64::from(i),
                    8.0,
                ));
            }
            for i in 0..4u32 {
                let fly = format!("{prefix}{}", i % 2);
                events.push(bout(
                    genotype,
                    "Water",
                    &fly,
                    3600.0 + 600.0 * f64::from(i),
                    5.0,
                ));
            }
        }
        Experiment::new(FeedTable::new(events), 120.0)
    }

    /// `n_flies` replicate flies producing byte-for-byte identical bout
    /// series, so cross-replicate variance is zero everywhere.
    pub fn identical_replicates_experiment(n_flies: usize) -> Experiment {
        let mut events = Vec::new();
        for fly in 0..n_flies {
            let fly_id = format!("r{fly}");
            for i in 0..6u32 {
                events.push(bout(
                    "w1118",
                    "AppleJuice",
                    &fly_id,
                    600.0 * f64::from(i + 1),
                    2.5,
                ));
            }
        }
        Experiment::new(FeedTable::new(events), 90.0)
    }

    /// An experiment with no recorded bouts.
    pub fn empty_experiment() -> Experiment {
        Experiment::new(FeedTable::default(), 60.0)
    }
}

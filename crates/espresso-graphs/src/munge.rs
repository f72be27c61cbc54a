//! The data-preparation pipeline shared by both plotting facades:
//! resample, cumulative-sum, and pivot steps.
//!
//! This module is crate-private on purpose. The public contract is the
//! renderer operations; these stages feed them.

use std::collections::{BTreeMap, BTreeSet};

use espresso_common::{EspressoError, FeedTable, Result};
use tracing::debug;

/// One resampled time bucket for a single key combination.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ResampledBin {
    /// Values of the grouping columns, in the order the keys were given.
    pub keys: Vec<String>,
    /// Bucket start, elapsed seconds since experiment start.
    pub time_s: f64,
    /// Summed volume within the bucket, microliters.
    pub volume_ul: f64,
    /// Number of feeding bouts within the bucket.
    pub feed_count: u32,
}

/// A resampled bucket with running totals within its key partition.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct CumulativePoint {
    /// Values of the grouping columns, in the order the keys were given.
    pub keys: Vec<String>,
    /// Bucket start, elapsed seconds since experiment start.
    pub time_s: f64,
    /// Running volume total within the key partition, microliters.
    pub cumulative_ul: f64,
    /// Running bout-count total within the key partition.
    pub cumulative_count: u32,
}

/// Wide layout for one stacked-area panel: one row per time bucket, one
/// column per color category.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct WideTable {
    /// Bucket starts, ascending.
    pub times: Vec<f64>,
    /// Color categories, sorted.
    pub columns: Vec<String>,
    /// `values[column][time index]`, summed volume in microliters.
    pub values: Vec<Vec<f64>>,
}

/// Validates the facet and hue columns for the cumulative renderer.
pub(crate) fn check_facets(
    row: Option<&str>,
    col: Option<&str>,
    hue: &str,
    table: &FeedTable,
) -> Result<()> {
    if let Some(row) = row {
        table.check_column(row)?;
    }
    if let Some(col) = col {
        table.check_column(col)?;
    }
    table.check_column(hue)
}

/// Buckets feed events into fixed-width time bins per key combination,
/// summing volume and bout count within each bin.
///
/// Buckets with no events are present with zero sums: every key partition
/// carries every bucket from 0 through the maximum observed bucket, so
/// downstream cumulative sums and stacked areas see contiguous series.
/// Output is sorted by key values, then bucket time.
pub(crate) fn groupby_resamp_sum(
    table: &FeedTable,
    keys: &[&str],
    width_s: f64,
) -> Result<Vec<ResampledBin>> {
    if width_s <= 0.0 {
        return Err(EspressoError::Config(format!(
            "resample width must be positive, got {width_s}s"
        )));
    }
    for key in keys {
        table.check_column(key)?;
    }

    let mut sums: BTreeMap<(Vec<String>, i64), (f64, u32)> = BTreeMap::new();
    let mut max_bucket = 0_i64;
    for event in table.events() {
        let key_values: Vec<String> = keys
            .iter()
            .filter_map(|k| event.categorical(k))
            .map(str::to_string)
            .collect();
        let bucket = ((event.time_s / width_s).floor() as i64).max(0);
        max_bucket = max_bucket.max(bucket);
        let entry = sums.entry((key_values, bucket)).or_insert((0.0, 0));
        entry.0 += event.volume_ul;
        entry.1 += 1;
    }
    if sums.is_empty() {
        return Ok(Vec::new());
    }

    // Zero-fill so every partition covers the full observed range.
    let partitions: BTreeSet<Vec<String>> = sums.keys().map(|(k, _)| k.clone()).collect();
    for partition in &partitions {
        for bucket in 0..=max_bucket {
            sums.entry((partition.clone(), bucket)).or_insert((0.0, 0));
        }
    }

    let bins: Vec<ResampledBin> = sums
        .into_iter()
        .map(|((keys, bucket), (volume_ul, feed_count))| ResampledBin {
            keys,
            time_s: bucket as f64 * width_s,
            volume_ul,
            feed_count,
        })
        .collect();
    debug!(
        rows = bins.len(),
        partitions = partitions.len(),
        width_s,
        "resampled feed events"
    );
    Ok(bins)
}

/// Computes running totals across time buckets within each key partition.
///
/// Sums never leak across partitions: they reset at every new key
/// combination. One output row per input row. Expects the sorted output
/// of [`groupby_resamp_sum`].
pub(crate) fn cumsum_for_cumulative(bins: &[ResampledBin]) -> Vec<CumulativePoint> {
    let mut out = Vec::with_capacity(bins.len());
    let mut current: Option<&[String]> = None;
    let mut volume = 0.0_f64;
    let mut count = 0_u32;
    for bin in bins {
        if current != Some(bin.keys.as_slice()) {
            current = Some(bin.keys.as_slice());
            volume = 0.0;
            count = 0;
        }
        volume += bin.volume_ul;
        count += bin.feed_count;
        out.push(CumulativePoint {
            keys: bin.keys.clone(),
            time_s: bin.time_s,
            cumulative_ul: volume,
            cumulative_count: count,
        });
    }
    out
}

/// Pivots `[group, color]`-keyed bins into the wide layout for a single
/// group value. Lossless: every (group, color, bucket) triple in the
/// input appears exactly once in the output matrix.
pub(crate) fn pivot_wide(bins: &[ResampledBin], group: &str) -> WideTable {
    let filtered: Vec<&ResampledBin> = bins
        .iter()
        .filter(|b| b.keys.first().is_some_and(|g| g == group))
        .collect();

    let columns: Vec<String> = filtered
        .iter()
        .filter_map(|b| b.keys.get(1).cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let mut times: Vec<f64> = filtered.iter().map(|b| b.time_s).collect();
    times.sort_by(f64::total_cmp);
    times.dedup();

    let mut values = vec![vec![0.0; times.len()]; columns.len()];
    for bin in &filtered {
        let Some(color) = bin.keys.get(1) else {
            continue;
        };
        if let (Ok(c), Ok(t)) = (
            columns.binary_search(color),
            times.binary_search_by(|t| t.total_cmp(&bin.time_s)),
        ) {
            values[c][t] = bin.volume_ul;
        }
    }
    WideTable {
        times,
        columns,
        values,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use espresso_common::test_utils::{assert_approx_eq, feed_fixtures};
    use proptest::prelude::*;

    #[test]
    fn resample_conserves_totals_per_partition() {
        let experiment = feed_fixtures::two_genotype_experiment();
        let bins =
            groupby_resamp_sum(experiment.feeds(), &["Genotype", "FoodChoice"], 600.0).unwrap();

        for (genotype, food, expected) in [
            ("w1118", "AppleJuice", 80.0),
            ("w1118", "Water", 20.0),
            ("Orco-GAL4", "AppleJuice", 80.0),
            ("Orco-GAL4", "Water", 20.0),
        ] {
            let total: f64 = bins
                .iter()
                .filter(|b| b.keys == [genotype, food])
                .map(|b| b.volume_ul)
                .sum();
            assert_approx_eq(total, expected, 1e-9);
        }
    }

    #[test]
    fn resample_zero_fills_contiguous_buckets() {
        let experiment = feed_fixtures::two_genotype_experiment();
        let bins =
            groupby_resamp_sum(experiment.feeds(), &["Genotype", "FoodChoice"], 600.0).unwrap();

        // Last bout is at 5400 s, so buckets run 0..=5400 in 600 s steps.
        let per_partition = 10;
        assert_eq!(bins.len(), 4 * per_partition);

        for partition in [
            ["w1118", "Water"],
            ["Orco-GAL4", "AppleJuice"],
        ] {
            let times: Vec<f64> = bins
                .iter()
                .filter(|b| b.keys == partition)
                .map(|b| b.time_s)
                .collect();
            let expected: Vec<f64> = (0..per_partition).map(|i| 600.0 * i as f64).collect();
            assert_eq!(times, expected, "gaps in partition {partition:?}");
        }
    }

    #[test]
    fn resample_rejects_unknown_keys_before_aggregating() {
        let experiment = feed_fixtures::two_genotype_experiment();
        let err =
            groupby_resamp_sum(experiment.feeds(), &["Genotype", "Flavor"], 600.0).unwrap_err();
        assert!(matches!(err, EspressoError::UnknownColumn(name) if name == "Flavor"));
    }

    #[test]
    fn resample_of_empty_table_is_empty() {
        let experiment = feed_fixtures::empty_experiment();
        let bins = groupby_resamp_sum(experiment.feeds(), &["Genotype"], 600.0).unwrap();
        assert!(bins.is_empty());
    }

    #[test]
    fn cumsum_resets_at_partition_boundaries() {
        let bins = vec![
            ResampledBin {
                keys: vec!["a".into()],
                time_s: 0.0,
                volume_ul: 1.0,
                feed_count: 1,
            },
            ResampledBin {
                keys: vec!["a".into()],
                time_s: 60.0,
                volume_ul: 2.0,
                feed_count: 2,
            },
            ResampledBin {
                keys: vec!["b".into()],
                time_s: 0.0,
                volume_ul: 4.0,
                feed_count: 1,
            },
        ];
        let points = cumsum_for_cumulative(&bins);
        assert_eq!(points.len(), 3);
        assert_approx_eq(points[1].cumulative_ul, 3.0, 1e-12);
        assert_eq!(points[1].cumulative_count, 3);
        // New partition starts from scratch.
        assert_approx_eq(points[2].cumulative_ul, 4.0, 1e-12);
        assert_eq!(points[2].cumulative_count, 1);
    }

    #[test]
    fn pivot_is_lossless() {
        let experiment = feed_fixtures::two_genotype_experiment();
        let bins =
            groupby_resamp_sum(experiment.feeds(), &["Genotype", "FoodChoice"], 600.0).unwrap();

        let triples_before = bins
            .iter()
            .filter(|b| b.keys[0] == "w1118")
            .count();
        let wide = pivot_wide(&bins, "w1118");
        let cells_after = wide.columns.len() * wide.times.len();
        assert_eq!(triples_before, cells_after);

        // Totals survive the reshape.
        let total: f64 = wide.values.iter().flatten().sum();
        assert_approx_eq(total, 100.0, 1e-9);
    }

    proptest! {
        #[test]
        fn cumulative_series_are_non_decreasing(
            volumes in proptest::collection::vec(0.0_f64..50.0, 1..40),
            width in 60.0_f64..1200.0,
        ) {
            let events: Vec<_> = volumes
                .iter()
                .enumerate()
                .map(|(i, &v)| {
                    feed_fixtures::bout("w1118", "AppleJuice", "r0", 37.0 * i as f64, v)
                })
                .collect();
            let table = espresso_common::FeedTable::new(events);
            let bins = groupby_resamp_sum(&table, &["Genotype", "FoodChoice"], width).unwrap();
            let points = cumsum_for_cumulative(&bins);

            for pair in points.windows(2) {
                if pair[0].keys == pair[1].keys {
                    prop_assert!(pair[1].cumulative_ul >= pair[0].cumulative_ul);
                    prop_assert!(pair[1].cumulative_count >= pair[0].cumulative_count);
                }
            }
        }

        #[test]
        fn resample_conserves_grand_total(
            volumes in proptest::collection::vec(0.0_f64..50.0, 0..40),
        ) {
            let events: Vec<_> = volumes
                .iter()
                .enumerate()
                .map(|(i, &v)| {
                    let food = if i % 2 == 0 { "AppleJuice" } else { "Water" };
                    feed_fixtures::bout("w1118", food, "r0", 61.0 * i as f64, v)
                })
                .collect();
            let table = espresso_common::FeedTable::new(events);
            let bins = groupby_resamp_sum(&table, &["FoodChoice"], 300.0).unwrap();

            let binned: f64 = bins.iter().map(|b| b.volume_ul).sum();
            let raw: f64 = volumes.iter().sum();
            prop_assert!((binned - raw).abs() < 1e-9);
        }
    }
}

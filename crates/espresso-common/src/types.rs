//! Core domain types for espresso feeding-assay data.

use serde::{Deserialize, Serialize};

use crate::error::{EspressoError, Result};

/// Categorical columns that may be used for grouping, coloring, or
/// faceting. Anything outside this namespace is an unknown column.
pub const CATEGORICAL_COLUMNS: [&str; 5] = [
    "Genotype",
    "FoodChoice",
    "Status",
    "Temperature",
    "FlyId",
];

/// A single feeding bout recorded by the assay rig.
///
/// Events are immutable once loaded; the plotting facades copy the owning
/// table before doing anything with it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedEvent {
    /// Fly genotype.
    pub genotype: String,
    /// Which food the fly fed from.
    pub food_choice: String,
    /// Experimental status label (e.g. "Test", "Sibling").
    pub status: String,
    /// Assay temperature label.
    pub temperature: String,
    /// Identifier of the fly that produced this bout.
    pub fly_id: String,
    /// Elapsed seconds since experiment start.
    pub time_s: f64,
    /// Bout duration in seconds.
    pub duration_s: f64,
    /// Volume consumed during the bout, in microliters.
    pub volume_ul: f64,
}

impl FeedEvent {
    /// Looks up the value of a categorical column on this event.
    ///
    /// Returns `None` for names outside [`CATEGORICAL_COLUMNS`].
    #[must_use]
    pub fn categorical(&self, column: &str) -> Option<&str> {
        match column {
            "Genotype" => Some(&self.genotype),
            "FoodChoice" => Some(&self.food_choice),
            "Status" => Some(&self.status),
            "Temperature" => Some(&self.temperature),
            "FlyId" => Some(&self.fly_id),
            _ => None,
        }
    }
}

/// The feed-event table owned by an experiment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeedTable {
    events: Vec<FeedEvent>,
}

impl FeedTable {
    /// Creates a table from a list of feed events.
    #[must_use]
    pub fn new(events: Vec<FeedEvent>) -> Self {
        Self { events }
    }

    /// Confirms that `name` is a valid categorical column of this table.
    ///
    /// # Errors
    ///
    /// Returns [`EspressoError::UnknownColumn`] naming the offending
    /// column when it is not part of [`CATEGORICAL_COLUMNS`].
    pub fn check_column(&self, name: &str) -> Result<()> {
        if CATEGORICAL_COLUMNS.contains(&name) {
            Ok(())
        } else {
            Err(EspressoError::UnknownColumn(name.to_string()))
        }
    }

    /// The events in recorded order.
    #[must_use]
    pub fn events(&self) -> &[FeedEvent] {
        &self.events
    }

    /// Number of feeding bouts in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether the table holds no events.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Latest event time in the table, if any.
    #[must_use]
    pub fn max_time_s(&self) -> Option<f64> {
        self.events
            .iter()
            .map(|e| e.time_s)
            .fold(None, |acc, t| Some(acc.map_or(t, |a: f64| a.max(t))))
    }
}

/// A loaded espresso experiment: the host boundary the plotting facades
/// are constructed from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Experiment {
    feeds: FeedTable,
    expt_duration_min: f64,
}

impl Experiment {
    /// Creates an experiment from its feed table and duration in minutes.
    #[must_use]
    pub fn new(feeds: FeedTable, expt_duration_min: f64) -> Self {
        Self {
            feeds,
            expt_duration_min,
        }
    }

    /// The feed-event table. Callers that mutate must copy first.
    #[must_use]
    pub fn feeds(&self) -> &FeedTable {
        &self.feeds
    }

    /// Experiment duration in minutes.
    #[must_use]
    pub fn expt_duration_min(&self) -> f64 {
        self.expt_duration_min
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event() -> FeedEvent {
        FeedEvent {
            genotype: "w1118".to_string(),
            food_choice: "AppleJuice".to_string(),
            status: "Test".to_string(),
            temperature: "22C".to_string(),
            fly_id: "w01".to_string(),
            time_s: 120.0,
            duration_s: 4.0,
            volume_ul: 0.5,
        }
    }

    #[test]
    fn categorical_lookup_covers_the_namespace() {
        let e = event();
        for column in CATEGORICAL_COLUMNS {
            assert!(e.categorical(column).is_some(), "missing {column}");
        }
        assert_eq!(e.categorical("Genotype"), Some("w1118"));
        assert_eq!(e.categorical("Volume"), None);
    }

    #[test]
    fn check_column_accepts_known_and_rejects_unknown() {
        let table = FeedTable::new(vec![event()]);
        assert!(table.check_column("FoodChoice").is_ok());

        let err = table.check_column("Flavor").unwrap_err();
        assert!(matches!(err, EspressoError::UnknownColumn(name) if name == "Flavor"));
    }

    #[test]
    fn max_time_is_none_for_empty_tables() {
        assert_eq!(FeedTable::default().max_time_s(), None);

        let mut late = event();
        late.time_s = 900.0;
        let table = FeedTable::new(vec![event(), late]);
        assert_eq!(table.max_time_s(), Some(900.0));
    }
}

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::error::RiskError;

/// One entry of a live indicator feed; `value` is `None` when the source marked
/// the entry as unavailable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub date: Option<NaiveDate>,
    pub value: Option<f64>,
}

/// The value the engine consumes from a feed, with the date it was observed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatestObservation {
    pub value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub as_of: Option<NaiveDate>,
}

/// Chronologically ordered (oldest first) observations of a single indicator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObservationSeries {
    name: String,
    entries: Vec<Observation>,
}

impl ObservationSeries {
    pub fn new(name: impl Into<String>, entries: Vec<Observation>) -> Self {
        Self {
            name: name.into(),
            entries,
        }
    }

    /// Builds an undated series from raw values in chronological order.
    pub fn from_values(
        name: impl Into<String>,
        values: impl IntoIterator<Item = Option<f64>>,
    ) -> Self {
        let entries = values
            .into_iter()
            .map(|value| Observation { date: None, value })
            .collect();
        Self::new(name, entries)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn entries(&self) -> &[Observation] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Most recent available observation, scanning back from the newest entry.
    pub fn latest(&self) -> Result<LatestObservation, RiskError> {
        self.entries
            .iter()
            .rev()
            .find_map(|entry| {
                entry.value.map(|value| LatestObservation {
                    value,
                    as_of: entry.date,
                })
            })
            .ok_or_else(|| RiskError::AllMissingData {
                series: self.name.clone(),
            })
    }
}

use serde::{Deserialize, Serialize};

use super::error::RiskError;
use super::level::OrdinalLevel;

/// Maps a continuous indicator onto an [`OrdinalLevel`] using a threshold ladder.
///
/// For every threshold `t_i` the classifier takes `q_i = floor(value / t_i)` and
/// keeps the index of the last non-zero quotient. No non-zero quotient yields
/// `floor_level`; otherwise the level is `index + offset`. A negative value
/// short-circuits to `negative_override` when one is configured.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaircaseClassifier {
    thresholds: Vec<f64>,
    floor_level: u8,
    offset: u8,
    negative_override: Option<u8>,
}

impl StaircaseClassifier {
    pub fn new(
        thresholds: Vec<f64>,
        floor_level: u8,
        offset: u8,
        negative_override: Option<u8>,
    ) -> Result<Self, RiskError> {
        if thresholds.is_empty() {
            return Err(RiskError::InvalidClassifier("threshold ladder is empty"));
        }
        if thresholds
            .iter()
            .any(|threshold| !threshold.is_finite() || *threshold <= 0.0)
        {
            return Err(RiskError::InvalidClassifier(
                "thresholds must be finite and positive",
            ));
        }
        if thresholds.windows(2).any(|pair| pair[0] >= pair[1]) {
            return Err(RiskError::InvalidClassifier(
                "thresholds must be strictly ascending",
            ));
        }

        let in_range = |level: usize| {
            (usize::from(OrdinalLevel::MIN)..=usize::from(OrdinalLevel::MAX)).contains(&level)
        };
        let highest = thresholds.len() - 1 + usize::from(offset);
        if !in_range(usize::from(floor_level))
            || !in_range(usize::from(offset))
            || !in_range(highest)
            || negative_override.is_some_and(|level| !in_range(usize::from(level)))
        {
            return Err(RiskError::InvalidClassifier(
                "every reachable level must lie in 1..=4",
            ));
        }

        Ok(Self {
            thresholds,
            floor_level,
            offset,
            negative_override,
        })
    }

    /// Occupancy-style ladder: `[25, 50, 75]`, floor 1, offset 2.
    pub fn capacity() -> Self {
        Self::preset(vec![25.0, 50.0, 75.0], 1, 2, None)
    }

    /// Active-case ladder: `[500, 1000, 1500]`, floor 1, offset 2.
    pub fn case_count() -> Self {
        Self::preset(vec![500.0, 1000.0, 1500.0], 1, 2, None)
    }

    /// Growth-rate ladder: `[1, 5]`, floor 2, offset 3, negative growth is level 1.
    pub fn growth_rate() -> Self {
        Self::preset(vec![1.0, 5.0], 2, 3, Some(1))
    }

    fn preset(
        thresholds: Vec<f64>,
        floor_level: u8,
        offset: u8,
        negative_override: Option<u8>,
    ) -> Self {
        Self {
            thresholds,
            floor_level,
            offset,
            negative_override,
        }
    }

    pub fn thresholds(&self) -> &[f64] {
        &self.thresholds
    }

    pub fn classify(&self, value: f64) -> Result<OrdinalLevel, RiskError> {
        if !value.is_finite() {
            return Err(RiskError::InvalidClassifierInput {
                value,
                reason: "value is not finite",
            });
        }

        if value < 0.0 {
            return match self.negative_override {
                Some(level) => OrdinalLevel::new(level),
                None => Err(RiskError::InvalidClassifierInput {
                    value,
                    reason: "negative values are not defined for this ladder",
                }),
            };
        }

        let last_exceeded = self
            .thresholds
            .iter()
            .map(|threshold| (value / threshold).floor())
            .enumerate()
            .filter(|(_, quotient)| *quotient != 0.0)
            .map(|(index, _)| index)
            .last();

        match last_exceeded {
            None => OrdinalLevel::new(self.floor_level),
            Some(index) => {
                let level = u8::try_from(index)
                    .ok()
                    .and_then(|index| index.checked_add(self.offset))
                    .unwrap_or(u8::MAX);
                OrdinalLevel::new(level)
            }
        }
    }
}

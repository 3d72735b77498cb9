use serde::{Deserialize, Serialize};
use std::fmt;

use super::error::RiskError;

/// Human-readable risk label shared by every domain and the overall score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskLabel {
    #[serde(rename = "very low")]
    VeryLow,
    #[serde(rename = "low")]
    Low,
    #[serde(rename = "high")]
    High,
    #[serde(rename = "very high")]
    VeryHigh,
}

impl RiskLabel {
    pub const fn ordered() -> [Self; 4] {
        [Self::VeryLow, Self::Low, Self::High, Self::VeryHigh]
    }

    /// Zero-based lookup; indexes past the end saturate at `VeryHigh`.
    pub const fn from_index(index: u8) -> Self {
        match index {
            0 => Self::VeryLow,
            1 => Self::Low,
            2 => Self::High,
            _ => Self::VeryHigh,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::VeryLow => "very low",
            Self::Low => "low",
            Self::High => "high",
            Self::VeryHigh => "very high",
        }
    }
}

impl fmt::Display for RiskLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One-based ordinal level in `1..=4`, produced by a classifier or a matrix lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct OrdinalLevel(u8);

impl OrdinalLevel {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 4;

    pub fn new(level: u8) -> Result<Self, RiskError> {
        if (Self::MIN..=Self::MAX).contains(&level) {
            Ok(Self(level))
        } else {
            Err(RiskError::InvalidOrdinalInput(i64::from(level)))
        }
    }

    /// Const constructor for compile-time tables whose cells are already in range.
    pub(crate) const fn from_table(level: u8) -> Self {
        Self(level)
    }

    pub const fn get(self) -> u8 {
        self.0
    }

    /// Position in a zero-based table such as the combination matrix.
    pub(crate) const fn index(self) -> usize {
        (self.0 - 1) as usize
    }

    pub const fn label(self) -> RiskLabel {
        RiskLabel::from_index(self.0 - 1)
    }

    /// Domain score for a one-based level: `level / 4`.
    pub fn normalized(self) -> f64 {
        f64::from(self.0) / f64::from(Self::MAX)
    }
}

impl TryFrom<u8> for OrdinalLevel {
    type Error = RiskError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<OrdinalLevel> for u8 {
    fn from(value: OrdinalLevel) -> Self {
        value.0
    }
}

impl fmt::Display for OrdinalLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Zero-based band (`0..=3`) of the personal-risk domain.
///
/// Distinct from [`OrdinalLevel`]: the personal domain reports
/// `floor(risk * 4 / limit)` while the indicator domains report `1..=4`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct PersonalBand(u8);

impl PersonalBand {
    pub const MAX: u8 = 3;

    /// Floors a continuous position on the 0..4 scale and clamps it into `0..=3`.
    pub fn from_scaled(scaled: f64) -> Self {
        Self(clamp_floor(scaled, Self::MAX))
    }

    pub const fn get(self) -> u8 {
        self.0
    }

    pub const fn label(self) -> RiskLabel {
        RiskLabel::from_index(self.0)
    }
}

/// Zero-based level (`0..=3`) of the aggregated overall score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct OverallLevel(u8);

impl OverallLevel {
    pub const MAX: u8 = 3;

    pub fn from_sum(sum: f64) -> Self {
        Self(clamp_floor(sum, Self::MAX))
    }

    pub const fn get(self) -> u8 {
        self.0
    }

    pub const fn label(self) -> RiskLabel {
        RiskLabel::from_index(self.0)
    }
}

fn clamp_floor(value: f64, max: u8) -> u8 {
    let floored = value.floor();
    if floored <= 0.0 {
        0
    } else if floored >= f64::from(max) {
        max
    } else {
        floored as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordinal_level_rejects_out_of_range_values() {
        assert_eq!(OrdinalLevel::new(0), Err(RiskError::InvalidOrdinalInput(0)));
        assert_eq!(OrdinalLevel::new(5), Err(RiskError::InvalidOrdinalInput(5)));
        assert_eq!(OrdinalLevel::new(4).map(OrdinalLevel::get), Ok(4));
    }

    #[test]
    fn labels_follow_one_based_and_zero_based_conventions() {
        let labels: Vec<_> = (1..=4)
            .map(|level| OrdinalLevel::new(level).expect("valid").label())
            .collect();
        assert_eq!(labels, RiskLabel::ordered().to_vec());

        assert_eq!(PersonalBand::from_scaled(0.2).label(), RiskLabel::VeryLow);
        assert_eq!(OverallLevel::from_sum(2.99).label(), RiskLabel::High);
    }

    #[test]
    fn bands_clamp_at_both_ends() {
        assert_eq!(PersonalBand::from_scaled(-1.0).get(), 0);
        assert_eq!(PersonalBand::from_scaled(7.5).get(), 3);
        assert_eq!(OverallLevel::from_sum(4.0).get(), 3);
    }

    #[test]
    fn labels_serialize_as_display_text() {
        for label in RiskLabel::ordered() {
            let encoded = serde_json::to_string(&label).expect("label serializes");
            assert_eq!(encoded, format!("\"{}\"", label.as_str()));
            let decoded: RiskLabel = serde_json::from_str(&encoded).expect("label parses");
            assert_eq!(decoded, label);
        }
    }

    #[test]
    fn ordinal_level_deserializes_through_validation() {
        let level: OrdinalLevel = serde_json::from_str("3").expect("valid level");
        assert_eq!(level.get(), 3);
        assert!(serde_json::from_str::<OrdinalLevel>("9").is_err());
    }
}

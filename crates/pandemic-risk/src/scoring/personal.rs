use serde::{Deserialize, Serialize};

use super::error::RiskError;
use super::level::PersonalBand;
use super::profile::{HouseholdMember, PersonProfile};
use super::tables::{AdverseTable, InfectionTable};

/// Probability that a household member is infected once the subject is.
pub const DEFAULT_SECONDARY_ATTACK_RATE: f64 = 0.2;

/// Calibration point mapped to the top of the personal-risk gauge. Scores above
/// it are legal and saturate at the highest band.
pub const DEFAULT_PERSONAL_LIMIT: f64 = 15.0;

/// Individual risk model built from the infection and adverse-outcome tables.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PersonalRiskModel {
    pub secondary_attack_rate: f64,
    pub limit: f64,
}

impl Default for PersonalRiskModel {
    fn default() -> Self {
        Self {
            secondary_attack_rate: DEFAULT_SECONDARY_ATTACK_RATE,
            limit: DEFAULT_PERSONAL_LIMIT,
        }
    }
}

impl PersonalRiskModel {
    pub fn new(secondary_attack_rate: f64, limit: f64) -> Result<Self, RiskError> {
        if !secondary_attack_rate.is_finite() || !(0.0..=1.0).contains(&secondary_attack_rate) {
            return Err(RiskError::InvalidTable(format!(
                "secondary attack rate {secondary_attack_rate} must lie in [0, 1]"
            )));
        }
        if !limit.is_finite() || limit <= 0.0 {
            return Err(RiskError::InvalidTable(format!(
                "personal risk limit {limit} must be positive"
            )));
        }
        Ok(Self {
            secondary_attack_rate,
            limit,
        })
    }

    /// Risk on the ~0..15 scale:
    /// `p_inf * p_adv(subject) * 100 + p_inf * sar * p_adv(household) * 100`.
    pub fn compute_risk(
        &self,
        subject: &PersonProfile,
        household: &HouseholdMember,
        infection: &InfectionTable,
        adverse: &AdverseTable,
    ) -> Result<f64, RiskError> {
        let p_infection = infection.probability_for(subject)?;
        let p_adverse_subject = adverse.probability_for(subject)?;
        let p_adverse_household = adverse.probability_for(household)?;

        let own = p_infection * p_adverse_subject * 100.0;
        let secondary = p_infection * self.secondary_attack_rate * p_adverse_household * 100.0;
        Ok(own + secondary)
    }

    /// `risk / limit`; not clamped.
    pub fn normalized(&self, risk: f64) -> f64 {
        risk / self.limit
    }

    pub fn band(&self, risk: f64) -> PersonalBand {
        PersonalBand::from_scaled(risk * 4.0 / self.limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_out_of_range_parameters() {
        assert!(PersonalRiskModel::new(1.2, 15.0).is_err());
        assert!(PersonalRiskModel::new(0.2, 0.0).is_err());
        assert_eq!(
            PersonalRiskModel::new(0.2, 15.0),
            Ok(PersonalRiskModel::default())
        );
    }

    #[test]
    fn band_saturates_above_the_calibration_limit() {
        let model = PersonalRiskModel::default();
        assert_eq!(model.band(0.0).get(), 0);
        assert_eq!(model.band(3.75).get(), 1);
        assert_eq!(model.band(14.99).get(), 3);
        assert_eq!(model.band(40.0).get(), 3);
        assert!(model.normalized(30.0) > 1.0);
    }
}

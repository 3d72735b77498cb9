use serde::Serialize;
use tracing::debug;

use super::classifier::StaircaseClassifier;
use super::error::RiskError;
use super::level::{OrdinalLevel, PersonalBand, RiskLabel};
use super::matrix::CombinationMatrix;
use super::personal::PersonalRiskModel;
use super::profile::{HouseholdMember, PersonProfile};
use super::tables::{AdverseTable, InfectionTable};

/// The four indicator domains feeding the overall score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskDomain {
    HealthSystem,
    Prevalence,
    Transmission,
    PersonalRisk,
}

impl RiskDomain {
    pub const fn ordered() -> [Self; 4] {
        [
            Self::HealthSystem,
            Self::Prevalence,
            Self::Transmission,
            Self::PersonalRisk,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::HealthSystem => "Health System Response",
            Self::Prevalence => "Prevalence",
            Self::Transmission => "Transmission",
            Self::PersonalRisk => "Risk Profile",
        }
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::HealthSystem => "health_system",
            Self::Prevalence => "prevalence",
            Self::Transmission => "transmission",
            Self::PersonalRisk => "personal_risk",
        }
    }
}

/// Named raw measurement contributing to a domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IndicatorKind {
    HospitalBeds,
    IcuBeds,
    ActiveCases,
    GrowthRate,
    Transmission,
    PersonalRisk,
}

impl IndicatorKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::HospitalBeds => "Hospital Bed Occupancy",
            Self::IcuBeds => "ICU Bed Occupancy",
            Self::ActiveCases => "Active cases",
            Self::GrowthRate => "Growth rate of new cases",
            Self::Transmission => "Transmission",
            Self::PersonalRisk => "Risk Profile",
        }
    }

    pub const fn domain(self) -> RiskDomain {
        match self {
            Self::HospitalBeds | Self::IcuBeds => RiskDomain::HealthSystem,
            Self::ActiveCases | Self::GrowthRate => RiskDomain::Prevalence,
            Self::Transmission => RiskDomain::Transmission,
            Self::PersonalRisk => RiskDomain::PersonalRisk,
        }
    }
}

/// A raw indicator value together with its own classification, when it has one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorReading {
    pub indicator: IndicatorKind,
    pub value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<OrdinalLevel>,
    /// Dashboard caption such as `"high - 60"`; the bare value when unclassified.
    pub caption: String,
}

impl IndicatorReading {
    fn classified(indicator: IndicatorKind, value: f64, level: OrdinalLevel) -> Self {
        Self {
            indicator,
            value,
            level: Some(level),
            caption: format!("{} - {}", level.label(), value),
        }
    }

    fn raw(indicator: IndicatorKind, value: f64) -> Self {
        Self {
            indicator,
            value,
            level: None,
            caption: value.to_string(),
        }
    }
}

/// How a domain expresses its level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum DomainLevel {
    /// One-based `1..=4` level from a classifier or the combination matrix.
    Ordinal(OrdinalLevel),
    /// Zero-based `0..=3` band of the personal-risk model.
    Band(PersonalBand),
    /// Externally chosen value without internal classification.
    Unclassified,
}

impl DomainLevel {
    pub fn label(self) -> Option<RiskLabel> {
        match self {
            Self::Ordinal(level) => Some(level.label()),
            Self::Band(band) => Some(band.label()),
            Self::Unclassified => None,
        }
    }
}

/// Per-domain output: raw readings, level, normalized score and label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DomainScore {
    pub domain: RiskDomain,
    pub indicators: Vec<IndicatorReading>,
    pub level: DomainLevel,
    pub score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<RiskLabel>,
}

impl DomainScore {
    fn new(
        domain: RiskDomain,
        indicators: Vec<IndicatorReading>,
        level: DomainLevel,
        score: f64,
    ) -> Self {
        Self {
            domain,
            indicators,
            level,
            score,
            label: level.label(),
        }
    }
}

/// Stateless scorer wrapping the classifier presets, the shared matrix and the
/// personal-risk model.
#[derive(Debug, Clone, PartialEq)]
pub struct DomainScorer {
    capacity: StaircaseClassifier,
    case_count: StaircaseClassifier,
    growth_rate: StaircaseClassifier,
    matrix: CombinationMatrix,
    personal: PersonalRiskModel,
}

impl Default for DomainScorer {
    fn default() -> Self {
        Self::new(PersonalRiskModel::default())
    }
}

impl DomainScorer {
    pub fn new(personal: PersonalRiskModel) -> Self {
        Self {
            capacity: StaircaseClassifier::capacity(),
            case_count: StaircaseClassifier::case_count(),
            growth_rate: StaircaseClassifier::growth_rate(),
            matrix: CombinationMatrix::CANONICAL,
            personal,
        }
    }

    pub fn personal_model(&self) -> &PersonalRiskModel {
        &self.personal
    }

    pub fn matrix(&self) -> &CombinationMatrix {
        &self.matrix
    }

    /// Bed and ICU figures, combined as `matrix[icu][beds]`.
    pub fn health_system(&self, beds: f64, icu: f64) -> Result<DomainScore, RiskError> {
        let beds_level = self.capacity.classify(beds)?;
        let icu_level = self.capacity.classify(icu)?;
        let combined = self.matrix.combine(icu_level, beds_level);

        debug!(beds, icu, %beds_level, %icu_level, %combined, "health system scored");

        Ok(DomainScore::new(
            RiskDomain::HealthSystem,
            vec![
                IndicatorReading::classified(IndicatorKind::HospitalBeds, beds, beds_level),
                IndicatorReading::classified(IndicatorKind::IcuBeds, icu, icu_level),
            ],
            DomainLevel::Ordinal(combined),
            combined.normalized(),
        ))
    }

    /// Active cases and growth rate, combined as `matrix[active][growth]`.
    pub fn prevalence(
        &self,
        active_cases: f64,
        growth_rate: f64,
    ) -> Result<DomainScore, RiskError> {
        let active_level = self.case_count.classify(active_cases)?;
        let growth_level = self.growth_rate.classify(growth_rate)?;
        let combined = self.matrix.combine(active_level, growth_level);

        debug!(
            active_cases,
            growth_rate,
            %active_level,
            %growth_level,
            %combined,
            "prevalence scored"
        );

        Ok(DomainScore::new(
            RiskDomain::Prevalence,
            vec![
                IndicatorReading::classified(
                    IndicatorKind::ActiveCases,
                    active_cases,
                    active_level,
                ),
                IndicatorReading::classified(
                    IndicatorKind::GrowthRate,
                    growth_rate,
                    growth_level,
                ),
            ],
            DomainLevel::Ordinal(combined),
            combined.normalized(),
        ))
    }

    /// Transmission intensity on a 0..100 scale, normalized by dividing by 100.
    pub fn transmission(&self, value: f64) -> Result<DomainScore, RiskError> {
        if !value.is_finite() || value < 0.0 {
            return Err(RiskError::InvalidClassifierInput {
                value,
                reason: "transmission must be finite and non-negative",
            });
        }

        debug!(value, "transmission scored");

        Ok(DomainScore::new(
            RiskDomain::Transmission,
            vec![IndicatorReading::raw(IndicatorKind::Transmission, value)],
            DomainLevel::Unclassified,
            value / 100.0,
        ))
    }

    pub fn personal(
        &self,
        subject: &PersonProfile,
        household: &HouseholdMember,
        infection: &InfectionTable,
        adverse: &AdverseTable,
    ) -> Result<DomainScore, RiskError> {
        let risk = self
            .personal
            .compute_risk(subject, household, infection, adverse)?;
        let band = self.personal.band(risk);

        debug!(risk, band = band.get(), "personal risk scored");

        Ok(DomainScore::new(
            RiskDomain::PersonalRisk,
            vec![IndicatorReading::raw(IndicatorKind::PersonalRisk, risk)],
            DomainLevel::Band(band),
            self.personal.normalized(risk),
        ))
    }
}

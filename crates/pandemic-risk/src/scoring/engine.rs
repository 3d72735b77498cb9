use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::domain::{DomainScore, DomainScorer};
use super::error::RiskError;
use super::overall::{OverallAggregator, OverallScore};
use super::personal::{PersonalRiskModel, DEFAULT_PERSONAL_LIMIT, DEFAULT_SECONDARY_ATTACK_RATE};
use super::profile::{CityCode, HouseholdMember, PersonProfile};
use super::transmission::{TransmissionSelector, PLACEHOLDER_TRANSMISSION};
use crate::data::RiskDataset;

/// Calibration knobs for the engine; everything else is fixed by the scoring model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    #[serde(default = "default_secondary_attack_rate")]
    pub secondary_attack_rate: f64,
    #[serde(default = "default_personal_limit")]
    pub personal_limit: f64,
    /// Value used by the fixed transmission selector.
    #[serde(default = "default_transmission_value")]
    pub transmission_value: f64,
}

fn default_secondary_attack_rate() -> f64 {
    DEFAULT_SECONDARY_ATTACK_RATE
}

fn default_personal_limit() -> f64 {
    DEFAULT_PERSONAL_LIMIT
}

fn default_transmission_value() -> f64 {
    PLACEHOLDER_TRANSMISSION
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            secondary_attack_rate: DEFAULT_SECONDARY_ATTACK_RATE,
            personal_limit: DEFAULT_PERSONAL_LIMIT,
            transmission_value: PLACEHOLDER_TRANSMISSION,
        }
    }
}

/// Subject and (optional) household member to assess.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentRequest {
    pub subject: PersonProfile,
    /// Defaults to the subject's own answers when absent.
    #[serde(default)]
    pub household: Option<HouseholdMember>,
}

impl AssessmentRequest {
    pub fn for_subject(subject: PersonProfile) -> Self {
        Self {
            subject,
            household: None,
        }
    }

    pub fn household(&self) -> HouseholdMember {
        self.household.unwrap_or(self.subject)
    }
}

/// Complete result for one subject: four domain scores plus the aggregate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskAssessment {
    pub city: CityCode,
    pub subject: PersonProfile,
    pub household: HouseholdMember,
    pub health_system: DomainScore,
    pub prevalence: DomainScore,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prevalence_as_of: Option<NaiveDate>,
    pub transmission: DomainScore,
    pub personal_risk: DomainScore,
    pub overall: OverallScore,
}

impl RiskAssessment {
    pub fn domains(&self) -> [&DomainScore; 4] {
        [
            &self.health_system,
            &self.prevalence,
            &self.transmission,
            &self.personal_risk,
        ]
    }
}

/// Pure scoring facade. Cheap to clone and safe to share across threads.
#[derive(Debug, Clone, PartialEq)]
pub struct RiskEngine {
    config: ScoringConfig,
    scorer: DomainScorer,
    aggregator: OverallAggregator,
}

impl Default for RiskEngine {
    fn default() -> Self {
        Self {
            config: ScoringConfig::default(),
            scorer: DomainScorer::default(),
            aggregator: OverallAggregator,
        }
    }
}

impl RiskEngine {
    pub fn new(config: ScoringConfig) -> Result<Self, RiskError> {
        let personal = PersonalRiskModel::new(config.secondary_attack_rate, config.personal_limit)?;
        Ok(Self {
            config,
            scorer: DomainScorer::new(personal),
            aggregator: OverallAggregator,
        })
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub fn scorer(&self) -> &DomainScorer {
        &self.scorer
    }

    pub fn health_system(&self, beds: f64, icu: f64) -> Result<DomainScore, RiskError> {
        self.scorer.health_system(beds, icu)
    }

    pub fn prevalence(
        &self,
        active_cases: f64,
        growth_rate: f64,
    ) -> Result<DomainScore, RiskError> {
        self.scorer.prevalence(active_cases, growth_rate)
    }

    pub fn transmission(&self, value: f64) -> Result<DomainScore, RiskError> {
        self.scorer.transmission(value)
    }

    pub fn personal(
        &self,
        dataset: &RiskDataset,
        request: &AssessmentRequest,
    ) -> Result<DomainScore, RiskError> {
        self.scorer.personal(
            &request.subject,
            &request.household(),
            &dataset.infection,
            &dataset.adverse,
        )
    }

    pub fn overall(
        &self,
        health: f64,
        prevalence: f64,
        transmission: f64,
        personal_risk: f64,
    ) -> Result<OverallScore, RiskError> {
        self.aggregator
            .aggregate(health, prevalence, transmission, personal_risk)
    }

    /// Runs every domain for the subject's city against one dataset snapshot.
    pub fn assess(
        &self,
        dataset: &RiskDataset,
        request: &AssessmentRequest,
        selector: &dyn TransmissionSelector,
    ) -> Result<RiskAssessment, RiskError> {
        let city = request.subject.city;

        let beds = dataset.health_system.lookup(city)?;
        let health_system = self.health_system(beds.beds, beds.icu)?;

        let active = dataset.prevalence.active(city)?.latest()?;
        let growth = dataset.prevalence.growth(city)?.latest()?;
        let prevalence = self.prevalence(active.value, growth.value)?;
        let prevalence_as_of = match (active.as_of, growth.as_of) {
            (Some(a), Some(g)) => Some(a.min(g)),
            (a, g) => a.or(g),
        };

        let transmission_value = selector.select(city, &dataset.transmission)?;
        let transmission = self.transmission(transmission_value)?;

        let personal_risk = self.personal(dataset, request)?;

        let overall = self.aggregator.aggregate_domains(
            &health_system,
            &prevalence,
            &transmission,
            &personal_risk,
        )?;

        debug!(%city, sum = overall.score, "domains aggregated");
        info!(
            %city,
            overall_level = overall.level.get(),
            label = %overall.label,
            "risk assessment computed"
        );

        Ok(RiskAssessment {
            city,
            subject: request.subject,
            household: request.household(),
            health_system,
            prevalence,
            prevalence_as_of,
            transmission,
            personal_risk,
            overall,
        })
    }
}

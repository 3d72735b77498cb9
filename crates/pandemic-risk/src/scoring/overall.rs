use serde::Serialize;

use super::domain::{DomainScore, RiskDomain};
use super::error::RiskError;
use super::level::{OverallLevel, RiskLabel};

/// Sum of the four domain scores and its discretized level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OverallScore {
    pub score: f64,
    pub level: OverallLevel,
    pub label: RiskLabel,
}

/// Unweighted aggregation: every domain counts equally.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OverallAggregator;

impl OverallAggregator {
    pub fn aggregate(
        &self,
        health: f64,
        prevalence: f64,
        transmission: f64,
        personal_risk: f64,
    ) -> Result<OverallScore, RiskError> {
        let inputs = [
            (RiskDomain::HealthSystem, health),
            (RiskDomain::Prevalence, prevalence),
            (RiskDomain::Transmission, transmission),
            (RiskDomain::PersonalRisk, personal_risk),
        ];

        let mut sum = 0.0;
        for (domain, value) in inputs {
            if !value.is_finite() || value < 0.0 {
                return Err(RiskError::InvalidDomainScore {
                    domain: domain.key(),
                    value,
                });
            }
            sum += value;
        }

        let level = OverallLevel::from_sum(sum);
        Ok(OverallScore {
            score: sum,
            level,
            label: level.label(),
        })
    }

    /// Aggregates the normalized scores of already-computed domains.
    pub fn aggregate_domains(
        &self,
        health: &DomainScore,
        prevalence: &DomainScore,
        transmission: &DomainScore,
        personal_risk: &DomainScore,
    ) -> Result<OverallScore, RiskError> {
        self.aggregate(
            health.score,
            prevalence.score,
            transmission.score,
            personal_risk.score,
        )
    }
}

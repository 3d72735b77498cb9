//! Risk-scoring engine.
//!
//! Raw indicator values (or categorical profile keys) go in, per-domain
//! `DomainScore`s and a single `OverallScore` come out. Every function in this
//! module tree is a pure function of its inputs: tables are read-only and nothing
//! is cached between calls.

mod classifier;
mod domain;
mod engine;
mod error;
mod level;
mod matrix;
mod observations;
mod overall;
mod personal;
mod profile;
mod tables;
mod transmission;

#[cfg(test)]
mod tests;

pub use classifier::StaircaseClassifier;
pub use domain::{
    DomainLevel, DomainScore, DomainScorer, IndicatorKind, IndicatorReading, RiskDomain,
};
pub use engine::{AssessmentRequest, RiskAssessment, RiskEngine, ScoringConfig};
pub use error::RiskError;
pub use level::{OrdinalLevel, OverallLevel, PersonalBand, RiskLabel};
pub use matrix::CombinationMatrix;
pub use observations::{LatestObservation, Observation, ObservationSeries};
pub use overall::{OverallAggregator, OverallScore};
pub use personal::{PersonalRiskModel, DEFAULT_PERSONAL_LIMIT, DEFAULT_SECONDARY_ATTACK_RATE};
pub(crate) use profile::flag_from_code;
pub use profile::{AgeBand, CityCode, Gender, HouseholdMember, PersonProfile};
pub use tables::{
    AdverseRow, AdverseTable, HealthSystemRow, HealthSystemTable, InfectionRow, InfectionTable,
    TransmissionRow, TransmissionTable,
};
pub use transmission::{
    FixedTransmission, PlaceTransmission, TransmissionSelector, PLACEHOLDER_TRANSMISSION,
};

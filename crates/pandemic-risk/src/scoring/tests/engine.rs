use std::collections::BTreeMap;

use super::common::{assert_close, dataset};
use crate::data::PrevalenceFeed;
use crate::scoring::{
    AssessmentRequest, CityCode, DomainLevel, FixedTransmission, HealthSystemRow,
    HealthSystemTable, IndicatorKind, ObservationSeries, OrdinalLevel, PersonProfile,
    PlaceTransmission, RiskEngine, RiskError, RiskLabel, ScoringConfig,
};

fn request() -> AssessmentRequest {
    AssessmentRequest::for_subject(
        PersonProfile::from_response_code("11310").expect("valid response code"),
    )
}

fn ordinal(level: u8) -> DomainLevel {
    DomainLevel::Ordinal(OrdinalLevel::new(level).expect("valid level"))
}

#[test]
fn health_system_combines_icu_row_with_bed_column() {
    let score = RiskEngine::default()
        .health_system(60.0, 30.0)
        .expect("health system");

    assert_eq!(score.indicators[0].indicator, IndicatorKind::HospitalBeds);
    assert_eq!(score.indicators[0].caption, "high - 60");
    assert_eq!(score.indicators[1].caption, "low - 30");
    assert_eq!(score.level, ordinal(3));
    assert_close(score.score, 0.75);
}

#[test]
fn prevalence_handles_shrinking_outbreaks() {
    let score = RiskEngine::default()
        .prevalence(200.0, -4.0)
        .expect("prevalence");
    assert_eq!(score.level, ordinal(1));
    assert_eq!(score.label, Some(RiskLabel::VeryLow));
    assert_close(score.score, 0.25);
}

#[test]
fn transmission_is_unclassified_and_scaled() {
    let score = RiskEngine::default().transmission(10.0).expect("transmission");
    assert_eq!(score.level, DomainLevel::Unclassified);
    assert_eq!(score.label, None);
    assert_close(score.score, 0.1);
    assert!(RiskEngine::default().transmission(-1.0).is_err());
}

#[test]
fn assess_runs_every_domain_against_the_snapshot() {
    let engine = RiskEngine::default();
    let assessment = engine
        .assess(&dataset(), &request(), &FixedTransmission::default())
        .expect("assessment");

    assert_eq!(assessment.city, CityCode::DELHI);
    assert_eq!(assessment.household, assessment.subject);
    assert_close(assessment.health_system.score, 0.75);
    assert_close(assessment.prevalence.score, 0.75);
    assert_eq!(assessment.prevalence.indicators[0].value, 1200.0);
    assert_close(assessment.transmission.score, 0.1);
    assert_close(assessment.personal_risk.score, 0.6);
    assert_close(assessment.overall.score, 2.2);
    assert_eq!(assessment.overall.level.get(), 2);
    assert_eq!(assessment.overall.label, RiskLabel::High);

    let sum: f64 = assessment.domains().iter().map(|domain| domain.score).sum();
    assert_close(sum, assessment.overall.score);
}

#[test]
fn assess_is_deterministic() {
    let engine = RiskEngine::default();
    let data = dataset();
    let first = engine.assess(&data, &request(), &FixedTransmission::default());
    let second = engine.assess(&data, &request(), &FixedTransmission::default());
    assert_eq!(first, second);
}

#[test]
fn place_selector_reads_the_transmission_table() {
    let selector = PlaceTransmission {
        place: "market".to_string(),
        kind: Some("indoor".to_string()),
    };
    let assessment = RiskEngine::default()
        .assess(&dataset(), &request(), &selector)
        .expect("assessment");
    assert_close(assessment.transmission.score, 0.4);

    let unknown = PlaceTransmission {
        place: "Stadium".to_string(),
        kind: None,
    };
    let error = RiskEngine::default()
        .assess(&dataset(), &request(), &unknown)
        .expect_err("no stadium row");
    assert!(error.is_not_found());
}

#[test]
fn not_found_and_ambiguous_lookups_are_distinct() {
    let engine = RiskEngine::default();
    let mut chennai = request();
    chennai.subject.city = CityCode::CHENNAI;
    let missing = engine
        .assess(&dataset(), &chennai, &FixedTransmission::default())
        .expect_err("chennai has no health system row");
    assert!(matches!(missing, RiskError::LookupNotFound { .. }));

    let mut duplicated = dataset();
    let row = HealthSystemRow {
        city: CityCode::DELHI,
        beds: 10.0,
        icu: 10.0,
    };
    duplicated.health_system = HealthSystemTable::new(vec![row.clone(), row]);
    let ambiguous = engine
        .assess(&duplicated, &request(), &FixedTransmission::default())
        .expect_err("duplicate rows");
    assert!(matches!(ambiguous, RiskError::LookupAmbiguous { matches: 2, .. }));
}

#[test]
fn fully_missing_feed_is_not_defaulted() {
    let mut data = dataset();
    let mut active = BTreeMap::new();
    active.insert(
        CityCode::DELHI,
        ObservationSeries::from_values("active_1", [None, None]),
    );
    let mut growth = BTreeMap::new();
    growth.insert(
        CityCode::DELHI,
        ObservationSeries::from_values("growth_1", [Some(1.0)]),
    );
    data.prevalence = PrevalenceFeed::new(active, growth);

    let error = RiskEngine::default()
        .assess(&data, &request(), &FixedTransmission::default())
        .expect_err("no active-case observation");
    assert_eq!(
        error,
        RiskError::AllMissingData {
            series: "active_1".to_string()
        }
    );
}

#[test]
fn engine_rejects_invalid_calibration() {
    let config = ScoringConfig {
        personal_limit: -1.0,
        ..ScoringConfig::default()
    };
    assert!(RiskEngine::new(config).is_err());
}

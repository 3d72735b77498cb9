use chrono::NaiveDate;
use pandemic_risk::data::{RiskDataset, SnapshotStore};
use pandemic_risk::scoring::{
    AssessmentRequest, CityCode, DomainLevel, FixedTransmission, PersonProfile, PlaceTransmission,
    RiskEngine, RiskError, RiskLabel,
};

fn sample_dataset() -> RiskDataset {
    RiskDataset::from_dir(concat!(env!("CARGO_MANIFEST_DIR"), "/../../data"))
        .expect("sample snapshot loads")
}

fn profile(code: &str) -> PersonProfile {
    PersonProfile::from_response_code(code).expect("valid response code")
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn young_delhi_resident_without_comorbidities() {
    let dataset = sample_dataset();
    let assessment = RiskEngine::default()
        .assess(
            &dataset,
            &AssessmentRequest::for_subject(profile("11100")),
            &FixedTransmission::default(),
        )
        .expect("assessment succeeds");

    assert_eq!(assessment.city, CityCode::DELHI);
    assert_close(assessment.health_system.score, 1.0);
    assert_eq!(assessment.health_system.indicators[1].caption, "very high - 81");

    assert_close(assessment.prevalence.score, 0.75);
    assert_eq!(assessment.prevalence.indicators[0].value, 1465.0);
    assert_eq!(assessment.prevalence.indicators[1].value, 3.6);
    assert_eq!(
        assessment.prevalence_as_of,
        NaiveDate::from_ymd_opt(2021, 5, 2)
    );

    assert_close(assessment.transmission.score, 0.1);
    assert_close(assessment.personal_risk.indicators[0].value, 0.756);
    assert_close(assessment.personal_risk.score, 0.0504);

    assert_close(assessment.overall.score, 1.9004);
    assert_eq!(assessment.overall.level.get(), 1);
    assert_eq!(assessment.overall.label, RiskLabel::Low);
}

#[test]
fn high_risk_household_with_measured_transmission() {
    let dataset = sample_dataset();
    let request = AssessmentRequest {
        subject: profile("21311"),
        household: Some(profile("12200")),
    };
    let selector = PlaceTransmission {
        place: "Market".to_string(),
        kind: Some("Indoor".to_string()),
    };

    let assessment = RiskEngine::default()
        .assess(&dataset, &request, &selector)
        .expect("assessment succeeds");

    assert_close(assessment.transmission.score, 0.42);
    assert_close(assessment.personal_risk.indicators[0].value, 13.4208);
    match assessment.personal_risk.level {
        DomainLevel::Band(band) => assert_eq!(band.get(), 3),
        other => panic!("expected a personal band, got {other:?}"),
    }
    assert_eq!(assessment.overall.level.get(), 3);
    assert_eq!(assessment.overall.label, RiskLabel::VeryHigh);
}

#[test]
fn chennai_growth_falls_back_to_last_reported_day() {
    let dataset = sample_dataset();
    let assessment = RiskEngine::default()
        .assess(
            &dataset,
            &AssessmentRequest::for_subject(profile("12100")),
            &FixedTransmission::default(),
        )
        .expect("assessment succeeds");

    assert_eq!(assessment.prevalence.indicators[1].value, 0.4);
    assert_close(assessment.prevalence.score, 0.5);
    assert_eq!(
        assessment.prevalence_as_of,
        NaiveDate::from_ymd_opt(2021, 5, 3)
    );
    assert_close(assessment.health_system.score, 0.5);
    assert_eq!(assessment.overall.level.get(), 1);
}

#[test]
fn unknown_city_is_reported_not_defaulted() {
    let dataset = sample_dataset();
    let error = RiskEngine::default()
        .assess(
            &dataset,
            &AssessmentRequest::for_subject(profile("13100")),
            &FixedTransmission::default(),
        )
        .expect_err("city 3 has no data");

    assert!(matches!(
        error,
        RiskError::LookupNotFound {
            table: "health system",
            ..
        }
    ));
}

#[test]
fn snapshot_store_serves_reloaded_dataset() {
    let store = SnapshotStore::new(RiskDataset::default());
    let empty = store.current();
    assert!(RiskEngine::default()
        .assess(
            &empty,
            &AssessmentRequest::for_subject(profile("11100")),
            &FixedTransmission::default(),
        )
        .is_err());

    store.replace(sample_dataset());
    let reloaded = store.current();
    assert!(RiskEngine::default()
        .assess(
            &reloaded,
            &AssessmentRequest::for_subject(profile("11100")),
            &FixedTransmission::default(),
        )
        .is_ok());
}

use super::common::{adverse_table, assert_close, household, infection_table, subject};
use crate::scoring::{
    AgeBand, CityCode, DomainLevel, DomainScorer, PersonalRiskModel, RiskError, RiskLabel,
};

#[test]
fn subject_and_household_contributions_add_up() {
    let model = PersonalRiskModel::default();
    let risk = model
        .compute_risk(&subject(), &household(), &infection_table(), &adverse_table())
        .expect("tables cover both profiles");

    assert_close(risk, 8.22);
    assert_eq!(model.band(risk).get(), 2);
    assert_close(model.normalized(risk), 0.548);
}

#[test]
fn household_adverse_risk_uses_the_subjects_infection_probability() {
    let model = PersonalRiskModel::default();
    let mut chennai_household = household();
    chennai_household.city = CityCode::CHENNAI;

    let delhi = model
        .compute_risk(&subject(), &household(), &infection_table(), &adverse_table())
        .expect("risk");
    let chennai = model
        .compute_risk(
            &subject(),
            &chennai_household,
            &infection_table(),
            &adverse_table(),
        )
        .expect("risk");

    assert_close(delhi, chennai);
}

#[test]
fn domain_score_reports_zero_based_band() {
    let score = DomainScorer::default()
        .personal(&subject(), &household(), &infection_table(), &adverse_table())
        .expect("personal domain");

    match score.level {
        DomainLevel::Band(band) => assert_eq!(band.get(), 2),
        other => panic!("expected a personal band, got {other:?}"),
    }
    assert_eq!(score.label, Some(RiskLabel::High));
    assert_close(score.score, 0.548);
    assert_close(score.indicators[0].value, 8.22);
}

#[test]
fn missing_profile_rows_surface_as_not_found() {
    let mut unknown = subject();
    unknown.age_band = AgeBand::Under20;
    unknown.diabetes = true;

    let error = PersonalRiskModel::default()
        .compute_risk(&unknown, &household(), &infection_table(), &adverse_table())
        .expect_err("no adverse row for under-20 diabetics");
    assert!(error.is_not_found());
    assert!(matches!(error, RiskError::LookupNotFound { .. }));
}

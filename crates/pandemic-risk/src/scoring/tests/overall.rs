use super::common::assert_close;
use crate::scoring::{OverallAggregator, RiskError, RiskLabel};

#[test]
fn mid_range_sum_lands_in_low() {
    let overall = OverallAggregator
        .aggregate(0.75, 0.5, 0.10, 0.27)
        .expect("valid scores");
    assert_close(overall.score, 1.62);
    assert_eq!(overall.level.get(), 1);
    assert_eq!(overall.label, RiskLabel::Low);
    assert_eq!(overall.label.to_string(), "low");
}

#[test]
fn saturated_sum_clamps_to_very_high() {
    let overall = OverallAggregator
        .aggregate(1.0, 1.0, 1.0, 1.0)
        .expect("valid scores");
    assert_eq!(overall.level.get(), 3);
    assert_eq!(overall.label, RiskLabel::VeryHigh);
}

#[test]
fn personal_score_above_one_still_clamps() {
    let overall = OverallAggregator
        .aggregate(0.25, 0.25, 0.1, 2.4)
        .expect("valid scores");
    assert_close(overall.score, 3.0);
    assert_eq!(overall.level.get(), 3);
}

#[test]
fn zero_scores_are_very_low() {
    let overall = OverallAggregator
        .aggregate(0.0, 0.0, 0.0, 0.0)
        .expect("valid scores");
    assert_eq!(overall.level.get(), 0);
    assert_eq!(overall.label, RiskLabel::VeryLow);
}

#[test]
fn invalid_domain_scores_name_the_domain() {
    assert_eq!(
        OverallAggregator.aggregate(0.5, f64::NAN, 0.1, 0.2).map_err(|err| match err {
            RiskError::InvalidDomainScore { domain, .. } => domain,
            _ => "other",
        }),
        Err("prevalence")
    );
    assert!(OverallAggregator.aggregate(0.5, 0.5, -0.1, 0.2).is_err());
}

#[test]
fn serialized_overall_score_carries_display_label() {
    let overall = OverallAggregator
        .aggregate(1.0, 1.0, 1.0, 1.0)
        .expect("valid scores");
    let encoded = serde_json::to_string(&overall).expect("overall serializes");
    assert_eq!(encoded, r#"{"score":4.0,"level":3,"label":"very high"}"#);
}

use std::collections::BTreeMap;

use crate::data::{PrevalenceFeed, RiskDataset};
use crate::scoring::{
    AdverseRow, AdverseTable, AgeBand, CityCode, Gender, HealthSystemRow, HealthSystemTable,
    InfectionRow, InfectionTable, ObservationSeries, PersonProfile, TransmissionRow,
    TransmissionTable,
};

pub(super) const TOLERANCE: f64 = 1e-9;

pub(super) fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < TOLERANCE,
        "expected {expected}, got {actual}"
    );
}

pub(super) fn subject() -> PersonProfile {
    PersonProfile {
        gender: Gender::Female,
        age_band: AgeBand::Over50,
        city: CityCode::DELHI,
        diabetes: true,
        hypertension: false,
    }
}

pub(super) fn household() -> PersonProfile {
    PersonProfile {
        gender: Gender::Male,
        age_band: AgeBand::From20To50,
        city: CityCode::DELHI,
        diabetes: false,
        hypertension: false,
    }
}

pub(super) fn infection_table() -> InfectionTable {
    let row = |gender, city, probability| InfectionRow {
        gender,
        city,
        probability,
    };
    InfectionTable::new(vec![
        row(Gender::Female, CityCode::DELHI, 0.3),
        row(Gender::Male, CityCode::DELHI, 0.35),
        row(Gender::Female, CityCode::CHENNAI, 0.2),
        row(Gender::Male, CityCode::CHENNAI, 0.25),
    ])
    .expect("valid infection table")
}

pub(super) fn adverse_table() -> AdverseTable {
    let row = |age_band, diabetes, hypertension, hospitalization, death| AdverseRow {
        age_band,
        diabetes,
        hypertension,
        hospitalization,
        death,
    };
    AdverseTable::new(vec![
        row(AgeBand::Over50, true, false, 0.2, 0.05),
        row(AgeBand::Over50, false, false, 0.1, 0.02),
        row(AgeBand::From20To50, false, false, 0.1, 0.02),
        row(AgeBand::Under20, false, false, 0.01, 0.0),
    ])
    .expect("valid adverse table")
}

pub(super) fn dataset() -> RiskDataset {
    let mut active = BTreeMap::new();
    active.insert(
        CityCode::DELHI,
        ObservationSeries::from_values("active_1", [Some(900.0), Some(1200.0), None]),
    );
    let mut growth = BTreeMap::new();
    growth.insert(
        CityCode::DELHI,
        ObservationSeries::from_values("growth_1", [Some(0.5), Some(3.0)]),
    );

    RiskDataset {
        health_system: HealthSystemTable::new(vec![HealthSystemRow {
            city: CityCode::DELHI,
            beds: 60.0,
            icu: 30.0,
        }]),
        infection: infection_table(),
        adverse: adverse_table(),
        prevalence: PrevalenceFeed::new(active, growth),
        transmission: TransmissionTable::new(vec![TransmissionRow {
            city: CityCode::DELHI,
            place: "Market".to_string(),
            kind: "Indoor".to_string(),
            transmission: 40.0,
        }]),
    }
}

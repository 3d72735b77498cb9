//! Read-only row sets keyed by categorical columns.
//!
//! Every lookup requires exactly one matching row. Tables are built once per
//! snapshot and shared by reference afterwards.

use serde::{Deserialize, Serialize};

use super::error::RiskError;
use super::profile::{AgeBand, CityCode, Gender, PersonProfile};

fn exactly_one<'a, R, F>(
    rows: &'a [R],
    table: &'static str,
    key: impl FnOnce() -> String,
    matches: F,
) -> Result<&'a R, RiskError>
where
    F: Fn(&R) -> bool,
{
    let mut found = rows.iter().filter(|row| matches(*row));
    match (found.next(), found.next()) {
        (Some(row), None) => Ok(row),
        (None, _) => Err(RiskError::LookupNotFound { table, key: key() }),
        (Some(_), Some(_)) => Err(RiskError::LookupAmbiguous {
            table,
            key: key(),
            matches: 2 + found.count(),
        }),
    }
}

fn check_probability(table: &'static str, column: &str, value: f64) -> Result<(), RiskError> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(RiskError::InvalidTable(format!(
            "{table} column {column} holds {value}, expected a probability in [0, 1]"
        )))
    }
}

/// Probability of infection for a gender in a city.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InfectionRow {
    pub gender: Gender,
    pub city: CityCode,
    pub probability: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InfectionTable {
    rows: Vec<InfectionRow>,
}

impl InfectionTable {
    pub const NAME: &'static str = "infection probabilities";

    pub fn new(rows: Vec<InfectionRow>) -> Result<Self, RiskError> {
        for row in &rows {
            check_probability(Self::NAME, "Prob", row.probability)?;
        }
        Ok(Self { rows })
    }

    pub fn rows(&self) -> &[InfectionRow] {
        &self.rows
    }

    pub fn lookup(&self, gender: Gender, city: CityCode) -> Result<&InfectionRow, RiskError> {
        exactly_one(
            &self.rows,
            Self::NAME,
            || format!("gender {:?}, city {}", gender, city),
            |row| row.gender == gender && row.city == city,
        )
    }

    pub fn probability_for(&self, profile: &PersonProfile) -> Result<f64, RiskError> {
        self.lookup(profile.gender, profile.city)
            .map(|row| row.probability)
    }
}

/// Hospitalisation and death probabilities for a comorbidity profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdverseRow {
    pub age_band: AgeBand,
    pub diabetes: bool,
    pub hypertension: bool,
    pub hospitalization: f64,
    pub death: f64,
}

impl AdverseRow {
    /// Probability of an adverse outcome: hospitalisation plus death.
    pub fn adverse_probability(&self) -> f64 {
        self.hospitalization + self.death
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AdverseTable {
    rows: Vec<AdverseRow>,
}

impl AdverseTable {
    pub const NAME: &'static str = "adverse outcome probabilities";

    pub fn new(rows: Vec<AdverseRow>) -> Result<Self, RiskError> {
        for row in &rows {
            check_probability(Self::NAME, "Hosp", row.hospitalization)?;
            check_probability(Self::NAME, "Death", row.death)?;
        }
        Ok(Self { rows })
    }

    pub fn rows(&self) -> &[AdverseRow] {
        &self.rows
    }

    pub fn lookup(
        &self,
        age_band: AgeBand,
        diabetes: bool,
        hypertension: bool,
    ) -> Result<&AdverseRow, RiskError> {
        exactly_one(
            &self.rows,
            Self::NAME,
            || {
                format!(
                    "age band {:?}, diabetes {}, hypertension {}",
                    age_band, diabetes, hypertension
                )
            },
            |row| {
                row.age_band == age_band
                    && row.diabetes == diabetes
                    && row.hypertension == hypertension
            },
        )
    }

    pub fn probability_for(&self, profile: &PersonProfile) -> Result<f64, RiskError> {
        self.lookup(profile.age_band, profile.diabetes, profile.hypertension)
            .map(AdverseRow::adverse_probability)
    }
}

/// Hospital and ICU bed figures published for a city.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthSystemRow {
    pub city: CityCode,
    pub beds: f64,
    pub icu: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HealthSystemTable {
    rows: Vec<HealthSystemRow>,
}

impl HealthSystemTable {
    pub const NAME: &'static str = "health system";

    pub fn new(rows: Vec<HealthSystemRow>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[HealthSystemRow] {
        &self.rows
    }

    pub fn lookup(&self, city: CityCode) -> Result<&HealthSystemRow, RiskError> {
        exactly_one(
            &self.rows,
            Self::NAME,
            || format!("city {city}"),
            |row| row.city == city,
        )
    }
}

/// Transmission intensity measured at one place in a city.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransmissionRow {
    pub city: CityCode,
    pub place: String,
    pub kind: String,
    pub transmission: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TransmissionTable {
    rows: Vec<TransmissionRow>,
}

impl TransmissionTable {
    pub const NAME: &'static str = "transmission";

    pub fn new(rows: Vec<TransmissionRow>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[TransmissionRow] {
        &self.rows
    }

    /// All places listed for a city, in file order.
    pub fn for_city(&self, city: CityCode) -> impl Iterator<Item = &TransmissionRow> {
        self.rows.iter().filter(move |row| row.city == city)
    }

    pub fn lookup(
        &self,
        city: CityCode,
        place: &str,
        kind: Option<&str>,
    ) -> Result<&TransmissionRow, RiskError> {
        exactly_one(
            &self.rows,
            Self::NAME,
            || match kind {
                Some(kind) => format!("city {city}, place '{place}', type '{kind}'"),
                None => format!("city {city}, place '{place}'"),
            },
            |row| {
                row.city == city
                    && row.place.eq_ignore_ascii_case(place)
                    && kind.map_or(true, |kind| row.kind.eq_ignore_ascii_case(kind))
            },
        )
    }
}

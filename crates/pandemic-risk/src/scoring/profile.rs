use serde::{Deserialize, Serialize};
use std::fmt;

use super::error::RiskError;

/// Gender as coded on the intake form (`1` female, `2` male).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Female,
    Male,
}

impl Gender {
    pub const fn code(self) -> u8 {
        match self {
            Self::Female => 1,
            Self::Male => 2,
        }
    }

    pub fn from_code(code: u8) -> Result<Self, RiskError> {
        match code {
            1 => Ok(Self::Female),
            2 => Ok(Self::Male),
            other => Err(RiskError::InvalidProfile(format!(
                "unknown gender code {other}"
            ))),
        }
    }
}

/// Age band as coded on the intake form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgeBand {
    #[serde(rename = "under_20")]
    Under20,
    #[serde(rename = "20_to_50")]
    From20To50,
    #[serde(rename = "over_50")]
    Over50,
}

impl AgeBand {
    pub const fn code(self) -> u8 {
        match self {
            Self::Under20 => 1,
            Self::From20To50 => 2,
            Self::Over50 => 3,
        }
    }

    pub fn from_code(code: u8) -> Result<Self, RiskError> {
        match code {
            1 => Ok(Self::Under20),
            2 => Ok(Self::From20To50),
            3 => Ok(Self::Over50),
            other => Err(RiskError::InvalidProfile(format!(
                "unknown age band code {other}"
            ))),
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Under20 => "Less than 20 years",
            Self::From20To50 => "20 to 50 years",
            Self::Over50 => "Greater than 50 years",
        }
    }
}

/// Numeric city code used as the key of every per-city table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CityCode(pub u16);

impl CityCode {
    pub const DELHI: Self = Self(1);
    pub const CHENNAI: Self = Self(2);

    pub fn name(self) -> Option<&'static str> {
        match self {
            Self::DELHI => Some("Delhi"),
            Self::CHENNAI => Some("Chennai"),
            _ => None,
        }
    }
}

impl fmt::Display for CityCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{} ({})", self.0, name),
            None => write!(f, "{}", self.0),
        }
    }
}

/// Categorical answers describing the person whose risk is being assessed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PersonProfile {
    pub gender: Gender,
    pub age_band: AgeBand,
    pub city: CityCode,
    pub diabetes: bool,
    pub hypertension: bool,
}

/// A member of the subject's household; only the comorbidity answers feed the
/// adverse-outcome lookup.
pub type HouseholdMember = PersonProfile;

impl PersonProfile {
    /// Parses the five-digit response code written by the intake form.
    ///
    /// Digits are, in order: gender, city, age band, diabetes flag, hypertension flag.
    pub fn from_response_code(code: &str) -> Result<Self, RiskError> {
        let digits = code
            .trim()
            .chars()
            .map(|ch| {
                ch.to_digit(10).map(|digit| digit as u8).ok_or_else(|| {
                    RiskError::InvalidProfile(format!("response code '{code}' is not numeric"))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let &[gender, city, age, diabetes, hypertension] = digits.as_slice() else {
            return Err(RiskError::InvalidProfile(format!(
                "response code '{code}' must have exactly five digits"
            )));
        };

        Ok(Self {
            gender: Gender::from_code(gender)?,
            age_band: AgeBand::from_code(age)?,
            city: CityCode(u16::from(city)),
            diabetes: flag_from_code("diabetes", diabetes)?,
            hypertension: flag_from_code("hypertension", hypertension)?,
        })
    }

    pub fn response_code(&self) -> String {
        format!(
            "{}{}{}{}{}",
            self.gender.code(),
            self.city.0,
            self.age_band.code(),
            u8::from(self.diabetes),
            u8::from(self.hypertension)
        )
    }
}

pub(crate) fn flag_from_code(field: &'static str, code: u8) -> Result<bool, RiskError> {
    match code {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(RiskError::InvalidProfile(format!(
            "{field} flag must be 0 or 1, got {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_response_code_digits_in_form_order() {
        let profile = PersonProfile::from_response_code("12310").expect("valid code");
        assert_eq!(profile.gender, Gender::Female);
        assert_eq!(profile.city, CityCode::CHENNAI);
        assert_eq!(profile.age_band, AgeBand::Over50);
        assert!(profile.diabetes);
        assert!(!profile.hypertension);
        assert_eq!(profile.response_code(), "12310");
    }

    #[test]
    fn rejects_malformed_response_codes() {
        for code in ["1231", "123101", "1x310", "32310", "12410", "12320"] {
            assert!(
                matches!(
                    PersonProfile::from_response_code(code),
                    Err(RiskError::InvalidProfile(_))
                ),
                "expected {code} to be rejected"
            );
        }
    }

    #[test]
    fn age_bands_use_readable_wire_names() {
        let encoded: Vec<String> = [AgeBand::Under20, AgeBand::From20To50, AgeBand::Over50]
            .iter()
            .map(|band| serde_json::to_string(band).expect("band serializes"))
            .collect();
        assert_eq!(encoded, [r#""under_20""#, r#""20_to_50""#, r#""over_50""#]);

        let json = concat!(
            r#"{"gender":"male","age_band":"20_to_50","city":2,"#,
            r#""diabetes":false,"hypertension":true}"#
        );
        let profile: PersonProfile = serde_json::from_str(json).expect("profile parses");
        assert_eq!(profile.response_code(), "22201");
    }

    #[test]
    fn city_display_includes_known_names() {
        assert_eq!(CityCode::DELHI.to_string(), "1 (Delhi)");
        assert_eq!(CityCode(7).to_string(), "7");
    }
}

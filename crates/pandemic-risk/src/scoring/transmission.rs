use super::error::RiskError;
use super::profile::CityCode;
use super::tables::TransmissionTable;

/// Fixed transmission value used until a place is chosen.
pub const PLACEHOLDER_TRANSMISSION: f64 = 10.0;

/// Supplies the transmission intensity (0..100) for a city.
pub trait TransmissionSelector: Send + Sync {
    fn select(&self, city: CityCode, table: &TransmissionTable) -> Result<f64, RiskError>;
}

/// Returns the same value for every city.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedTransmission(pub f64);

impl Default for FixedTransmission {
    fn default() -> Self {
        Self(PLACEHOLDER_TRANSMISSION)
    }
}

impl TransmissionSelector for FixedTransmission {
    fn select(&self, _city: CityCode, _table: &TransmissionTable) -> Result<f64, RiskError> {
        Ok(self.0)
    }
}

/// Uses the measured transmission of one place (and optionally one place type).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceTransmission {
    pub place: String,
    pub kind: Option<String>,
}

impl TransmissionSelector for PlaceTransmission {
    fn select(&self, city: CityCode, table: &TransmissionTable) -> Result<f64, RiskError> {
        table
            .lookup(city, &self.place, self.kind.as_deref())
            .map(|row| row.transmission)
    }
}

/// Failures raised while classifying, combining or looking up risk inputs.
///
/// None of these are retryable: each is a deterministic consequence of the input
/// data, so callers surface them instead of substituting a default score.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RiskError {
    #[error("no row in {table} matches {key}")]
    LookupNotFound { table: &'static str, key: String },
    #[error("{matches} rows in {table} match {key}; expected exactly one")]
    LookupAmbiguous {
        table: &'static str,
        key: String,
        matches: usize,
    },
    #[error("every observation of {series} is unavailable")]
    AllMissingData { series: String },
    #[error("value {value} cannot be classified: {reason}")]
    InvalidClassifierInput { value: f64, reason: &'static str },
    #[error("ordinal level {0} is outside 1..=4")]
    InvalidOrdinalInput(i64),
    #[error("invalid classifier parameters: {0}")]
    InvalidClassifier(&'static str),
    #[error("invalid combination matrix: {0}")]
    InvalidMatrix(&'static str),
    #[error("invalid table data: {0}")]
    InvalidTable(String),
    #[error("invalid profile: {0}")]
    InvalidProfile(String),
    #[error("{domain} score {value} must be finite and non-negative")]
    InvalidDomainScore { domain: &'static str, value: f64 },
}

impl RiskError {
    /// True when the failure comes from a categorical lookup that found no row.
    pub fn is_not_found(&self) -> bool {
        matches!(self, RiskError::LookupNotFound { .. })
    }
}

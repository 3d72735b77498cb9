use metrics_exporter_prometheus::PrometheusHandle;
use pandemic_risk::data::{RiskDataset, SnapshotStore};
use pandemic_risk::error::AppError;
use pandemic_risk::scoring::{
    FixedTransmission, PersonProfile, PlaceTransmission, RiskEngine, TransmissionSelector,
};
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) snapshot: Arc<SnapshotStore>,
    pub(crate) engine: Arc<RiskEngine>,
    pub(crate) data_dir: Arc<PathBuf>,
}

/// How the transmission domain gets its value for one assessment.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub(crate) enum TransmissionChoice {
    Place {
        place: String,
        #[serde(default, rename = "type")]
        kind: Option<String>,
    },
    Value {
        value: f64,
    },
}

impl TransmissionChoice {
    pub(crate) fn selector(
        choice: Option<Self>,
        engine: &RiskEngine,
    ) -> Box<dyn TransmissionSelector> {
        match choice {
            Some(Self::Place { place, kind }) => Box::new(PlaceTransmission { place, kind }),
            Some(Self::Value { value }) => Box::new(FixedTransmission(value)),
            None => Box::new(FixedTransmission(engine.config().transmission_value)),
        }
    }
}

/// Reads the snapshot off the async runtime's worker threads.
pub(crate) async fn load_dataset(dir: PathBuf) -> Result<RiskDataset, AppError> {
    tokio::task::spawn_blocking(move || RiskDataset::from_dir(dir))
        .await
        .map_err(|err| AppError::Io(std::io::Error::other(err)))?
        .map_err(AppError::from)
}

pub(crate) fn parse_profile(raw: &str) -> Result<PersonProfile, String> {
    PersonProfile::from_response_code(raw).map_err(|err| err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transmission_choice_accepts_place_or_value() {
        let place: TransmissionChoice =
            serde_json::from_str(r#"{"place":"Market","type":"Indoor"}"#).expect("place");
        assert_eq!(
            place,
            TransmissionChoice::Place {
                place: "Market".to_string(),
                kind: Some("Indoor".to_string()),
            }
        );

        let value: TransmissionChoice = serde_json::from_str(r#"{"value":25}"#).expect("value");
        assert_eq!(value, TransmissionChoice::Value { value: 25.0 });
    }

    #[test]
    fn parse_profile_reports_bad_codes() {
        assert!(parse_profile("11100").is_ok());
        let message = parse_profile("1110").expect_err("four digits");
        assert!(message.contains("five digits"));
    }
}

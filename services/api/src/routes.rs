use crate::infra::{load_dataset, AppState, TransmissionChoice};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use pandemic_risk::error::AppError;
use pandemic_risk::scoring::{
    AssessmentRequest, DomainScore, OverallScore, PersonProfile, RiskAssessment,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

/// A respondent given either as the five-digit form code or as explicit fields.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum ProfileInput {
    Code(String),
    Profile(PersonProfile),
}

impl ProfileInput {
    fn resolve(self) -> Result<PersonProfile, AppError> {
        match self {
            Self::Code(code) => Ok(PersonProfile::from_response_code(&code)?),
            Self::Profile(profile) => Ok(profile),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct AssessmentPayload {
    pub(crate) subject: ProfileInput,
    #[serde(default)]
    pub(crate) household: Option<ProfileInput>,
    #[serde(default)]
    pub(crate) transmission: Option<TransmissionChoice>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct HealthSystemPayload {
    pub(crate) beds: f64,
    pub(crate) icu: f64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PrevalencePayload {
    pub(crate) active_cases: f64,
    pub(crate) growth_rate: f64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OverallPayload {
    pub(crate) health_system: f64,
    pub(crate) prevalence: f64,
    pub(crate) transmission: f64,
    pub(crate) personal_risk: f64,
}

#[derive(Debug, Serialize)]
pub(crate) struct ReloadResponse {
    pub(crate) status: &'static str,
    pub(crate) cities: usize,
}

pub(crate) fn risk_routes() -> Router {
    Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/v1/risk/assessment", post(assessment_endpoint))
        .route("/api/v1/risk/health-system", post(health_system_endpoint))
        .route("/api/v1/risk/prevalence", post(prevalence_endpoint))
        .route("/api/v1/risk/overall", post(overall_endpoint))
        .route("/api/v1/risk/snapshot/reload", post(reload_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn assessment_endpoint(
    Extension(state): Extension<AppState>,
    Json(payload): Json<AssessmentPayload>,
) -> Result<Json<RiskAssessment>, AppError> {
    let AssessmentPayload {
        subject,
        household,
        transmission,
    } = payload;

    let request = AssessmentRequest {
        subject: subject.resolve()?,
        household: household.map(ProfileInput::resolve).transpose()?,
    };
    let selector = TransmissionChoice::selector(transmission, &state.engine);
    let dataset = state.snapshot.current();

    let assessment = state.engine.assess(&dataset, &request, selector.as_ref())?;
    Ok(Json(assessment))
}

pub(crate) async fn health_system_endpoint(
    Extension(state): Extension<AppState>,
    Json(payload): Json<HealthSystemPayload>,
) -> Result<Json<DomainScore>, AppError> {
    Ok(Json(state.engine.health_system(payload.beds, payload.icu)?))
}

pub(crate) async fn prevalence_endpoint(
    Extension(state): Extension<AppState>,
    Json(payload): Json<PrevalencePayload>,
) -> Result<Json<DomainScore>, AppError> {
    Ok(Json(
        state
            .engine
            .prevalence(payload.active_cases, payload.growth_rate)?,
    ))
}

pub(crate) async fn overall_endpoint(
    Extension(state): Extension<AppState>,
    Json(payload): Json<OverallPayload>,
) -> Result<Json<OverallScore>, AppError> {
    Ok(Json(state.engine.overall(
        payload.health_system,
        payload.prevalence,
        payload.transmission,
        payload.personal_risk,
    )?))
}

pub(crate) async fn reload_endpoint(
    Extension(state): Extension<AppState>,
) -> Result<Json<ReloadResponse>, AppError> {
    let dataset = load_dataset(state.data_dir.as_ref().clone()).await?;
    let cities = dataset.health_system.rows().len();
    state.snapshot.replace(dataset);

    info!(cities, data_dir = %state.data_dir.display(), "risk snapshot reloaded");

    Ok(Json(ReloadResponse {
        status: "reloaded",
        cities,
    }))
}

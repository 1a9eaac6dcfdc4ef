//! HTTP router and handlers.

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::{HeaderName, HeaderValue};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use socratic_core::model::{
    LanguageOption, LessonPlanRequest, LogEntry, ParentViewRequest, TurnRequest, LANGUAGES,
};

use crate::error::AppError;
use crate::state::AppState;

/// Response header carrying `ok` or the relay failure reason.
pub const RELAY_STATUS_HEADER: &str = "x-relay-status";

/// Create the HTTP router with all routes configured.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/turn", post(turn))
        .route("/log", post(log_turn).get(log_index))
        .route("/log/:grade", get(list_log))
        .route("/lesson_plan", post(lesson_plan))
        .route("/parent_view", post(parent_view))
        .route("/languages", get(languages))
        .route("/health", get(health))
        .with_state(state)
}

/// Wrap the router with CORS for `origins` and request tracing.
pub fn with_layers(router: Router, origins: &[String]) -> Result<Router> {
    Ok(router
        .layer(cors_layer(origins)?)
        .layer(TraceLayer::new_for_http()))
}

/// Any method and header from the listed origins, with credentials.
pub fn cors_layer(origins: &[String]) -> Result<CorsLayer> {
    let origins = origins
        .iter()
        .map(|o| {
            HeaderValue::from_str(o).with_context(|| format!("invalid CORS origin: {o}"))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
        .expose_headers([HeaderName::from_static(RELAY_STATUS_HEADER)]))
}

/// Body plus the relay status header. Relay failures still answer 200.
fn relay_response<B: Serialize>(status: &'static str, body: B) -> Response {
    ([(RELAY_STATUS_HEADER, status)], Json(body)).into_response()
}

/// POST /turn - evaluate a student's explanation
pub async fn turn(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<TurnRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(req) = payload?;
    let outcome = state
        .relay
        .socratic_feedback(req.grade, &req.topic, &req.transcript)
        .await;
    let status = outcome.status();
    let body = outcome.into_assessment();
    Ok(relay_response(status, body))
}

/// Response for POST /log
#[derive(Debug, Serialize, Deserialize)]
pub struct LogResponse {
    pub status: String,
    /// Entries now logged for the grade.
    pub entries: usize,
}

/// POST /log - append a turn to the in-memory log
pub async fn log_turn(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<TurnRequest>, JsonRejection>,
) -> Result<Json<LogResponse>, AppError> {
    let Json(req) = payload?;
    let entries = state.logs.append(req.grade, &req.topic, &req.transcript);
    tracing::info!(grade = req.grade, entries, "logged student turn");
    Ok(Json(LogResponse {
        status: "logged".to_string(),
        entries,
    }))
}

/// One grade's entry count in the log index
#[derive(Debug, Serialize, Deserialize)]
pub struct GradeLogSummary {
    pub grade: i64,
    pub entries: usize,
}

/// Response for GET /log
#[derive(Debug, Serialize, Deserialize)]
pub struct LogIndexResponse {
    pub grades: Vec<GradeLogSummary>,
}

/// GET /log - grades with logged turns and their counts
pub async fn log_index(State(state): State<Arc<AppState>>) -> Json<LogIndexResponse> {
    let grades = state
        .logs
        .summary()
        .into_iter()
        .map(|(grade, entries)| GradeLogSummary { grade, entries })
        .collect();
    Json(LogIndexResponse { grades })
}

/// Response for GET /log/:grade
#[derive(Debug, Serialize, Deserialize)]
pub struct LogListResponse {
    pub grade: i64,
    pub entries: Vec<LogEntry>,
}

/// GET /log/:grade - list logged turns for a grade
pub async fn list_log(
    State(state): State<Arc<AppState>>,
    grade: Result<Path<i64>, PathRejection>,
) -> Result<Json<LogListResponse>, AppError> {
    let Path(grade) = grade?;
    Ok(Json(LogListResponse {
        grade,
        entries: state.logs.entries(grade),
    }))
}

/// POST /lesson_plan - lesson plan tailored to assessments
pub async fn lesson_plan(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<LessonPlanRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(req) = payload?;
    let outcome = state
        .relay
        .lesson_plan(req.grade, &req.topic, &req.assessments, &req.language)
        .await;
    let status = outcome.status();
    let body = outcome.into_topic_body(&req.topic);
    Ok(relay_response(status, body))
}

/// POST /parent_view - guidance for parents, optionally translated
pub async fn parent_view(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ParentViewRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(req) = payload?;
    let outcome = state
        .relay
        .parent_guidance(req.grade, &req.topic, &req.assessments, &req.language)
        .await;
    let status = outcome.status();
    let body = outcome.into_topic_body(&req.topic);
    Ok(relay_response(status, body))
}

/// Response for GET /languages
#[derive(Debug, Serialize)]
pub struct LanguagesResponse {
    pub languages: &'static [LanguageOption],
}

/// GET /languages - translation targets for parent guidance
pub async fn languages() -> Json<LanguagesResponse> {
    Json(LanguagesResponse {
        languages: LANGUAGES,
    })
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    /// Name of the configured LLM provider.
    pub provider: String,
}

/// GET /health
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.uptime_seconds(),
        provider: state.relay.provider_name().to_string(),
    })
}

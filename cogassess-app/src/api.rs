//! HTTP API for assessment sessions
//!
//! Endpoints:
//! - GET /health - Health check and tick cadence
//! - POST /session/new - Create new session
//! - GET /session/{id} - Observe the session (one render tick)
//! - DELETE /session/{id} - Abandon the session
//! - POST /session/{id}/start - Submit the consent form
//! - POST /session/{id}/respond - Answer the current trial
//! - GET /session/{id}/report - Demographics and sub-test summaries

use std::sync::Arc;

use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response as HttpResponse},
    routing::{get, post},
};
use cogassess_core::{ConsentForm, Response};
use cogassess_experiment::{AssessmentError, SessionReport, StageView};
use cogassess_timing::Clock;
use serde::Serialize;
use tracing::info;

use crate::app::{AppState, spawn_ticker};

#[derive(Debug, Serialize)]
pub struct NewSessionResponse {
    pub session_id: String,
    pub observe_url: String,
}

#[derive(Debug, Serialize)]
pub struct TickReport {
    pub samples: usize,
    pub mean_interval_ms: f64,
    pub jitter_ms: f64,
    pub max_interval_ms: f64,
    pub effective_hz: f64,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub sessions_active: usize,
    pub tick_interval_ms: u64,
    pub tick: TickReport,
}

#[derive(Debug)]
pub enum ApiError {
    UnknownSession(String),
    Assessment(AssessmentError),
}

impl From<AssessmentError> for ApiError {
    fn from(e: AssessmentError) -> Self {
        ApiError::Assessment(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> HttpResponse {
        let (status, msg) = match self {
            ApiError::UnknownSession(id) => (StatusCode::NOT_FOUND, format!("unknown session {id}")),
            ApiError::Assessment(e) => {
                let status = match &e {
                    AssessmentError::ConsentRejected(_) => StatusCode::UNPROCESSABLE_ENTITY,
                    AssessmentError::InvalidResponse(_) => StatusCode::BAD_REQUEST,
                    AssessmentError::TrialNotPresented
                    | AssessmentError::StaleResponse { .. }
                    | AssessmentError::NotAccepting { .. } => StatusCode::CONFLICT,
                    _ => StatusCode::INTERNAL_SERVER_ERROR,
                };
                (status, e.to_string())
            }
        };
        (status, Json(serde_json::json!({ "error": msg }))).into_response()
    }
}

pub fn create_router<C: Clock + 'static>(state: Arc<AppState<C>>) -> Router {
    Router::new()
        .route("/health", get(health::<C>))
        .route("/session/new", post(create_session::<C>))
        .route(
            "/session/:id",
            get(observe_session::<C>).delete(end_session::<C>),
        )
        .route("/session/:id/start", post(start_session::<C>))
        .route("/session/:id/respond", post(respond::<C>))
        .route("/session/:id/report", get(report::<C>))
        .with_state(state)
}

async fn health<C: Clock>(State(state): State<Arc<AppState<C>>>) -> Json<HealthResponse> {
    let stats = state.tick_stats().await;
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        sessions_active: state.session_count().await,
        tick_interval_ms: state.config.tick_interval_ms,
        tick: TickReport {
            samples: stats.samples,
            mean_interval_ms: stats.average_interval_ns / 1e6,
            jitter_ms: stats.jitter_ns / 1e6,
            max_interval_ms: stats.max_interval_ns / 1e6,
            effective_hz: stats.effective_hz,
        },
    })
}

async fn create_session<C: Clock>(
    State(state): State<Arc<AppState<C>>>,
) -> Result<Json<NewSessionResponse>, ApiError> {
    let session_id = state.create_session().await?;
    Ok(Json(NewSessionResponse {
        observe_url: format!("/session/{session_id}"),
        session_id,
    }))
}

async fn observe_session<C: Clock>(
    State(state): State<Arc<AppState<C>>>,
    Path(id): Path<String>,
) -> Result<Json<StageView>, ApiError> {
    let session = state
        .session(&id)
        .await
        .ok_or(ApiError::UnknownSession(id))?;
    let mut session = session.lock().await;
    Ok(Json(session.machine.observe()?))
}

async fn end_session<C: Clock>(
    State(state): State<Arc<AppState<C>>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    if state.remove_session(&id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::UnknownSession(id))
    }
}

async fn start_session<C: Clock>(
    State(state): State<Arc<AppState<C>>>,
    Path(id): Path<String>,
    Json(form): Json<ConsentForm>,
) -> Result<Json<StageView>, ApiError> {
    let session = state
        .session(&id)
        .await
        .ok_or(ApiError::UnknownSession(id))?;
    let mut session = session.lock().await;
    Ok(Json(session.machine.start(form)?))
}

async fn respond<C: Clock>(
    State(state): State<Arc<AppState<C>>>,
    Path(id): Path<String>,
    Json(response): Json<Response>,
) -> Result<Json<StageView>, ApiError> {
    let session = state
        .session(&id)
        .await
        .ok_or(ApiError::UnknownSession(id))?;
    let mut session = session.lock().await;
    Ok(Json(session.machine.respond(response)?))
}

async fn report<C: Clock>(
    State(state): State<Arc<AppState<C>>>,
    Path(id): Path<String>,
) -> Result<Json<SessionReport>, ApiError> {
    let session = state
        .session(&id)
        .await
        .ok_or(ApiError::UnknownSession(id))?;
    let session = session.lock().await;
    Ok(Json(session.machine.report()))
}

/// Run the API server
pub async fn run_server<C: Clock + 'static>(
    addr: &str,
    state: Arc<AppState<C>>,
) -> anyhow::Result<()> {
    let ticker = spawn_ticker(Arc::clone(&state));
    let router = create_router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "assessment server listening");
    let served = axum::serve(listener, router).await;
    ticker.abort();
    served?;
    Ok(())
}

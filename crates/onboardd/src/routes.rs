//! API routes for onboardd
//!
//! Handlers parse input, call into `service`, and map errors to status codes.

use crate::server::AppState;
use crate::service::{self, ServiceError, ServiceResult};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use onboard_common::api::{
    AskRequest, AskResponse, EscalateResponse, HealthResponse, OnboardingDetail, PreviewResponse,
    RejectRequest, RemindersResponse,
};
use onboard_common::clock::parse_date;
use onboard_common::{
    EscalationRequest, NewOnboarding, OnboardingRecord, TaskRecord, Ticket, VERSION,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::error;

type AppStateArc = Arc<AppState>;
type ApiResult<T> = Result<Json<T>, (StatusCode, String)>;

fn into_http(e: ServiceError) -> (StatusCode, String) {
    let status = match &e {
        ServiceError::NotFound { .. } => StatusCode::NOT_FOUND,
        ServiceError::Invalid(inner) if inner.is_input_error() => StatusCode::BAD_REQUEST,
        ServiceError::Invalid(_) | ServiceError::Store(_) => {
            error!("  Request failed: {:#}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    (status, e.to_string())
}

/// Run a workflow on the blocking pool; the store does synchronous SQLite I/O
async fn blocking<T, F>(state: AppStateArc, work: F) -> Result<T, (StatusCode, String)>
where
    F: FnOnce(&AppState) -> ServiceResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(move || work(&*state))
        .await
        .map_err(|e| into_http(anyhow::Error::new(e).context("store task failed").into()))?
        .map_err(into_http)
}

// ============================================================================
// Health
// ============================================================================

pub fn health_routes() -> Router<AppStateArc> {
    Router::new().route("/health", get(health))
}

async fn health(State(state): State<AppStateArc>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: VERSION.to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        templates: state.generator.catalog().len(),
        knowledge_topics: state.resolver.knowledge().len(),
        chat_delivery: state.delivery.is_enabled(),
    })
}

// ============================================================================
// Onboarding
// ============================================================================

pub fn onboarding_routes() -> Router<AppStateArc> {
    Router::new()
        .route("/v1/onboardings", get(list_onboardings).post(create_onboarding))
        .route("/v1/onboardings/:id", get(get_onboarding))
        .route("/v1/onboardings/:id/approve", post(approve_onboarding))
        .route("/v1/onboardings/:id/reject", post(reject_onboarding))
}

async fn list_onboardings(State(state): State<AppStateArc>) -> ApiResult<Vec<OnboardingRecord>> {
    let records = blocking(state, |s| Ok(s.store.list_onboardings()?)).await?;
    Ok(Json(records))
}

async fn create_onboarding(
    State(state): State<AppStateArc>,
    Json(req): Json<NewOnboarding>,
) -> Result<(StatusCode, Json<OnboardingRecord>), (StatusCode, String)> {
    let record = blocking(state, move |s| service::create_onboarding(s, req)).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

async fn get_onboarding(
    State(state): State<AppStateArc>,
    Path(id): Path<String>,
) -> ApiResult<OnboardingDetail> {
    blocking(state, move |s| service::detail(s, &id)).await.map(Json)
}

async fn approve_onboarding(
    State(state): State<AppStateArc>,
    Path(id): Path<String>,
) -> ApiResult<OnboardingDetail> {
    blocking(state, move |s| service::approve(s, &id)).await.map(Json)
}

async fn reject_onboarding(
    State(state): State<AppStateArc>,
    Path(id): Path<String>,
    Json(req): Json<RejectRequest>,
) -> ApiResult<OnboardingRecord> {
    blocking(state, move |s| service::reject(s, &id, &req.reason))
        .await
        .map(Json)
}

// ============================================================================
// Tasks and reminders
// ============================================================================

pub fn task_routes() -> Router<AppStateArc> {
    Router::new().route("/v1/tasks/:id/toggle", post(toggle_task))
}

async fn toggle_task(
    State(state): State<AppStateArc>,
    Path(id): Path<String>,
) -> ApiResult<TaskRecord> {
    blocking(state, move |s| service::toggle_task(s, &id)).await.map(Json)
}

pub fn reminder_routes() -> Router<AppStateArc> {
    Router::new()
        .route("/v1/reminders", get(list_reminders))
        .route("/v1/reminders/run", post(run_reminders))
}

async fn list_reminders(State(state): State<AppStateArc>) -> ApiResult<RemindersResponse> {
    blocking(state, service::reminders).await.map(Json)
}

async fn run_reminders(State(state): State<AppStateArc>) -> ApiResult<RemindersResponse> {
    blocking(state, service::run_reminders).await.map(Json)
}

// ============================================================================
// Template preview
// ============================================================================

#[derive(Debug, Deserialize)]
struct PreviewQuery {
    #[serde(default)]
    role: String,
    #[serde(default)]
    grade: String,
    start_date: String,
    #[serde(default)]
    lang: Option<String>,
}

pub fn template_routes() -> Router<AppStateArc> {
    Router::new().route("/v1/templates/preview", get(preview_template))
}

async fn preview_template(
    State(state): State<AppStateArc>,
    Query(q): Query<PreviewQuery>,
) -> ApiResult<PreviewResponse> {
    let start = parse_date(&q.start_date).map_err(|e| into_http(e.into()))?;
    let lang = q.lang.as_deref().unwrap_or(onboard_common::DEFAULT_LANGUAGE);
    Ok(Json(service::preview(&state, &q.role, &q.grade, start, lang)))
}

// ============================================================================
// Chat and tickets
// ============================================================================

pub fn chat_routes() -> Router<AppStateArc> {
    Router::new()
        .route("/v1/chat/ask", post(ask))
        .route("/v1/chat/escalate", post(escalate))
}

async fn ask(State(state): State<AppStateArc>, Json(req): Json<AskRequest>) -> Json<AskResponse> {
    Json(service::ask(&state, &req.question, req.channel.as_deref()))
}

async fn escalate(
    State(state): State<AppStateArc>,
    Json(req): Json<EscalationRequest>,
) -> Result<(StatusCode, Json<EscalateResponse>), (StatusCode, String)> {
    let ticket = blocking(state, move |s| service::escalate(s, &req)).await?;
    let message = ticket.confirmation();
    Ok((StatusCode::CREATED, Json(EscalateResponse { ticket, message })))
}

pub fn ticket_routes() -> Router<AppStateArc> {
    Router::new()
        .route("/v1/tickets", get(list_tickets))
        .route("/v1/tickets/:id/resolve", post(resolve_ticket))
}

async fn list_tickets(State(state): State<AppStateArc>) -> ApiResult<Vec<Ticket>> {
    blocking(state, service::list_tickets).await.map(Json)
}

async fn resolve_ticket(
    State(state): State<AppStateArc>,
    Path(id): Path<String>,
) -> ApiResult<Ticket> {
    blocking(state, move |s| service::resolve_ticket(s, &id)).await.map(Json)
}

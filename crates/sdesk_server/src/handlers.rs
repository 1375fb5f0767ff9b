use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;
use time::OffsetDateTime;

use sdesk_core::categorize::{suggest_category, CategorySuggestion};
use sdesk_core::domain::{Category, Incident, NewIncident, Priority, Status};
use sdesk_core::lifecycle;
use sdesk_core::monitor::{breaches_nearing, monitor, SlaMonitorRow};
use sdesk_core::policy::PriorityPolicy;
use sdesk_core::sla::{evaluate, SlaEvaluation};
use sdesk_core::store::{IncidentFilter, IncidentStore};

use crate::auth::CallerIdentity;
use crate::error::ApiError;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn IncidentStore>,
    pub policy: Arc<PriorityPolicy>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/incidents", post(create_incident).get(list_incidents))
        .route("/api/incidents/sla-monitor", get(sla_monitor))
        .route("/api/incidents/sla-alerts", get(sla_alerts))
        .route("/api/incidents/categorize", post(categorize))
        .route("/api/incidents/{id}/acknowledge", post(acknowledge_incident))
        .route("/api/incidents/{id}/resolve", post(resolve_incident))
        .route("/api/incidents/{id}/close", post(close_incident))
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

#[derive(Debug, Deserialize)]
struct CreateIncidentRequest {
    name: String,
    email: String,
    description: String,
    category: String,
    priority: String,
}

#[derive(Debug, Serialize)]
struct CreateIncidentResponse {
    incident: Incident,
    evaluation: SlaEvaluation,
}

async fn create_incident(
    State(state): State<AppState>,
    Json(req): Json<CreateIncidentRequest>,
) -> Result<(StatusCode, Json<CreateIncidentResponse>), ApiError> {
    let fields = NewIncident {
        reporter_name: req.name,
        reporter_email: req.email,
        description: req.description,
        category: Category::parse(&req.category)?,
        priority: Priority::parse(&req.priority)?,
    };

    let now = OffsetDateTime::now_utc();
    let incident = state.store.create(&fields, now)?;
    let evaluation = evaluate(&incident, &state.policy, now)?;
    tracing::info!(incident_id = incident.id, priority = incident.priority.as_str(), "incident created");

    Ok((
        StatusCode::CREATED,
        Json(CreateIncidentResponse { incident, evaluation }),
    ))
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    status: Option<String>,
    category: Option<String>,
    priority: Option<String>,
}

fn parse_filter(query: &ListQuery) -> Result<IncidentFilter, ApiError> {
    let mut filter = IncidentFilter::default();
    if let Some(status) = query.status.as_deref() {
        filter.status = Some(Status::parse(status)?);
    }
    if let Some(category) = query.category.as_deref() {
        filter.category = Some(Category::parse(category)?);
    }
    if let Some(priority) = query.priority.as_deref() {
        filter.priority = Some(Priority::parse(priority)?);
    }
    Ok(filter)
}

/// Lightweight listing: incident rows only, no SLA evaluation.
async fn list_incidents(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Incident>>, ApiError> {
    let filter = parse_filter(&query)?;
    Ok(Json(state.store.list(&filter)?))
}

/// Wire row for the SLA dashboard: one unified shape carrying both the
/// breach projection and the near-breach flags.
#[derive(Debug, Serialize)]
struct MonitorRowWire {
    id: i64,
    name: String,
    priority: Priority,
    status: Status,
    is_sla_breached: bool,
    time_remaining: Option<String>,
    nearing_acknowledgment: bool,
    nearing_resolution: bool,
}

fn human_duration(total_seconds: i64) -> String {
    let secs = total_seconds.max(0);
    let days = secs / 86_400;
    let hours = (secs % 86_400) / 3_600;
    let minutes = (secs % 3_600) / 60;
    let seconds = secs % 60;
    if days > 0 {
        format!("{days}d {hours}h")
    } else if hours > 0 {
        format!("{hours}h {minutes}m")
    } else if minutes > 0 {
        format!("{minutes}m {seconds}s")
    } else {
        format!("{seconds}s")
    }
}

fn to_wire(row: SlaMonitorRow) -> MonitorRowWire {
    MonitorRowWire {
        id: row.id,
        name: row.reporter_name,
        priority: row.priority,
        status: row.status,
        is_sla_breached: row.is_sla_breached,
        time_remaining: row.time_remaining_seconds.map(human_duration),
        nearing_acknowledgment: row.evaluation.nearing_acknowledgment,
        nearing_resolution: row.evaluation.nearing_resolution,
    }
}

async fn sla_monitor(
    caller: CallerIdentity,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<MonitorRowWire>>, ApiError> {
    let filter = parse_filter(&query)?;
    let now = OffsetDateTime::now_utc();
    let rows = monitor(state.store.as_ref(), &state.policy, &filter, now)?;
    tracing::info!(actor = %caller.0, rows = rows.len(), "sla monitor scan");
    Ok(Json(rows.into_iter().map(to_wire).collect()))
}

async fn sla_alerts(
    caller: CallerIdentity,
    State(state): State<AppState>,
) -> Result<Json<Vec<i64>>, ApiError> {
    let now = OffsetDateTime::now_utc();
    let ids = breaches_nearing(state.store.as_ref(), &state.policy, now)?;
    tracing::info!(actor = %caller.0, alerts = ids.len(), "near-breach scan");
    Ok(Json(ids))
}

async fn acknowledge_incident(
    caller: CallerIdentity,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Incident>, ApiError> {
    let now = OffsetDateTime::now_utc();
    let incident = lifecycle::acknowledge(state.store.as_ref(), id, &caller.0, now)?;
    tracing::info!(actor = %caller.0, incident_id = id, "incident acknowledged");
    Ok(Json(incident))
}

async fn resolve_incident(
    caller: CallerIdentity,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Incident>, ApiError> {
    let now = OffsetDateTime::now_utc();
    let incident = lifecycle::resolve(state.store.as_ref(), id, &caller.0, now)?;
    tracing::info!(actor = %caller.0, incident_id = id, "incident resolved");
    Ok(Json(incident))
}

async fn close_incident(
    caller: CallerIdentity,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Incident>, ApiError> {
    let now = OffsetDateTime::now_utc();
    let incident = lifecycle::close(state.store.as_ref(), id, &caller.0, now)?;
    tracing::info!(actor = %caller.0, incident_id = id, "incident closed");
    Ok(Json(incident))
}

#[derive(Debug, Deserialize)]
struct CategorizeRequest {
    description: String,
}

async fn categorize(
    Json(req): Json<CategorizeRequest>,
) -> Json<CategorySuggestion> {
    Json(suggest_category(&req.description))
}

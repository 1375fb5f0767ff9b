use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::domain::{Priority, Status};
use crate::error::AppError;
use crate::policy::PriorityPolicy;
use crate::sla::{evaluate, SlaEvaluation};
use crate::store::{IncidentFilter, IncidentStore};

/// One monitor row: the evaluation paired with the identifying incident
/// fields the dashboard displays, plus the stage-relevant merged projection
/// (`is_sla_breached` / `time_remaining_seconds`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SlaMonitorRow {
    pub id: i64,
    pub reporter_name: String,
    pub priority: Priority,
    pub status: Status,
    pub is_sla_breached: bool,
    pub time_remaining_seconds: Option<i64>,
    pub evaluation: SlaEvaluation,
}

/// Stage-relevant breach flag: the acknowledgment verdict while the incident
/// is New, otherwise a breach of either stage.
fn merged_breach(status: Status, eval: &SlaEvaluation) -> bool {
    match status {
        Status::New => eval.ack_breached,
        Status::Acknowledged | Status::Resolved | Status::Closed => {
            eval.ack_breached || eval.resolve_breached
        }
    }
}

fn merged_remaining(status: Status, eval: &SlaEvaluation) -> Option<i64> {
    match status {
        Status::New => eval.time_remaining_to_ack_seconds,
        Status::Acknowledged => eval.time_remaining_to_resolve_seconds,
        Status::Resolved | Status::Closed => None,
    }
}

/// Evaluate every incident matching `filter` at `now`. With no status filter
/// the scan defaults to non-Closed incidents. Read-only: performs no writes,
/// so a caller abandoning a large scan leaves nothing inconsistent. An empty
/// store yields an empty vec.
pub fn monitor(
    store: &dyn IncidentStore,
    policy: &PriorityPolicy,
    filter: &IncidentFilter,
    now: OffsetDateTime,
) -> Result<Vec<SlaMonitorRow>, AppError> {
    let incidents = store.list(filter)?;
    let mut out = Vec::with_capacity(incidents.len());

    for incident in incidents {
        if filter.status.is_none() && incident.status == Status::Closed {
            continue;
        }
        let evaluation = evaluate(&incident, policy, now)?;
        out.push(SlaMonitorRow {
            id: incident.id,
            reporter_name: incident.reporter_name,
            priority: incident.priority,
            status: incident.status,
            is_sla_breached: merged_breach(incident.status, &evaluation),
            time_remaining_seconds: merged_remaining(incident.status, &evaluation),
            evaluation,
        });
    }

    Ok(out)
}

/// Ids of incidents currently inside a near-breach warning window, for
/// polling or push-alerting callers.
pub fn breaches_nearing(
    store: &dyn IncidentStore,
    policy: &PriorityPolicy,
    now: OffsetDateTime,
) -> Result<Vec<i64>, AppError> {
    let rows = monitor(store, policy, &IncidentFilter::default(), now)?;
    Ok(rows
        .into_iter()
        .filter(|r| r.evaluation.nearing_acknowledgment || r.evaluation.nearing_resolution)
        .map(|r| r.id)
        .collect())
}

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::domain::{Incident, Status};
use crate::error::AppError;
use crate::policy::PriorityPolicy;
use crate::timefmt::parse_rfc3339;

/// Derived SLA verdict for one incident at one instant. Never persisted;
/// recomputed fresh on every query.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SlaEvaluation {
    pub incident_id: i64,
    pub ack_breached: bool,
    pub resolve_breached: bool,
    pub time_remaining_to_ack_seconds: Option<i64>,
    pub time_remaining_to_resolve_seconds: Option<i64>,
    pub nearing_acknowledgment: bool,
    pub nearing_resolution: bool,
}

fn elapsed_seconds(from: OffsetDateTime, to: OffsetDateTime) -> i64 {
    (to - from).whole_seconds()
}

/// Evaluate one incident against the SLA policy at `now`.
///
/// Pure and deterministic: identical `(incident, now)` inputs always produce
/// the identical evaluation. Breach is strictly `elapsed > deadline`; the
/// remaining time is `max(0, deadline - elapsed)` and never negative; the
/// nearing flags fire inside the policy's warning window only while the stage
/// is still unbreached.
///
/// Stage semantics:
/// - New: acknowledgment fields are live against `now`; resolution fields are
///   not yet applicable.
/// - Acknowledged: the acknowledgment verdict is frozen at `acknowledged_at`
///   (the stage already ended); resolution fields are live against `now`.
/// - Resolved/Closed: both verdicts are frozen facts computed from the final
///   timestamps; remaining times are `None` and nearing flags false.
pub fn evaluate(
    incident: &Incident,
    policy: &PriorityPolicy,
    now: OffsetDateTime,
) -> Result<SlaEvaluation, AppError> {
    let deadlines = policy.deadlines_for(incident.priority);
    let created = parse_rfc3339("created_at", &incident.created_at)?;

    let eval = match incident.status {
        Status::New => {
            let elapsed = elapsed_seconds(created, now);
            let breached = elapsed > deadlines.ack_seconds;
            let remaining = (deadlines.ack_seconds - elapsed).max(0);
            SlaEvaluation {
                incident_id: incident.id,
                ack_breached: breached,
                resolve_breached: false,
                time_remaining_to_ack_seconds: Some(remaining),
                time_remaining_to_resolve_seconds: None,
                nearing_acknowledgment: !breached
                    && remaining <= policy.warning_window_seconds(deadlines.ack_seconds),
                nearing_resolution: false,
            }
        }
        Status::Acknowledged => {
            let acked = parse_required(incident, "acknowledged_at", &incident.acknowledged_at)?;
            let ack_elapsed = elapsed_seconds(created, acked);
            let ack_breached = ack_elapsed > deadlines.ack_seconds;

            let elapsed = elapsed_seconds(acked, now);
            let resolve_breached = elapsed > deadlines.resolve_seconds;
            let remaining = (deadlines.resolve_seconds - elapsed).max(0);
            SlaEvaluation {
                incident_id: incident.id,
                ack_breached,
                resolve_breached,
                // Frozen at its final value: the acknowledgment stage ended at
                // `acknowledged_at` and is never recomputed against `now`.
                time_remaining_to_ack_seconds: Some((deadlines.ack_seconds - ack_elapsed).max(0)),
                time_remaining_to_resolve_seconds: Some(remaining),
                nearing_acknowledgment: false,
                nearing_resolution: !resolve_breached
                    && remaining <= policy.warning_window_seconds(deadlines.resolve_seconds),
            }
        }
        Status::Resolved | Status::Closed => {
            let acked = parse_required(incident, "acknowledged_at", &incident.acknowledged_at)?;
            let resolved = parse_required(incident, "resolved_at", &incident.resolved_at)?;
            SlaEvaluation {
                incident_id: incident.id,
                ack_breached: elapsed_seconds(created, acked) > deadlines.ack_seconds,
                resolve_breached: elapsed_seconds(acked, resolved) > deadlines.resolve_seconds,
                time_remaining_to_ack_seconds: None,
                time_remaining_to_resolve_seconds: None,
                nearing_acknowledgment: false,
                nearing_resolution: false,
            }
        }
    };

    Ok(eval)
}

fn parse_required(
    incident: &Incident,
    field: &str,
    value: &Option<String>,
) -> Result<OffsetDateTime, AppError> {
    let Some(s) = value.as_deref() else {
        // The store invariant makes this unreachable for well-formed rows;
        // surface it rather than guessing a timestamp.
        return Err(AppError::new(
            "SLA_TS_MISSING",
            format!("Incident {} is {} but has no {field}", incident.id, incident.status.as_str()),
        ));
    };
    parse_rfc3339(field, s)
}

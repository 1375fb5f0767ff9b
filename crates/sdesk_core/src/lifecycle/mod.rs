use time::OffsetDateTime;

use crate::domain::{Incident, Status};
use crate::error::AppError;
use crate::store::{IncidentStore, TransitionUpdate};
use crate::timefmt::to_rfc3339;

// Lifecycle state machine: New -> Acknowledged -> Resolved -> Closed.
//
// Each transition is a single atomic compare-and-set through the store, so
// re-invoking an already-applied transition (or racing a duplicate request)
// fails with INVALID_TRANSITION instead of silently succeeding, and a stamp
// that would break created_at <= acknowledged_at <= resolved_at is rejected
// with VALIDATION_FAILED inside that same atomic update. `actor` identifies
// the caller for audit logging upstream; it is never persisted.

pub fn acknowledge(
    store: &dyn IncidentStore,
    id: i64,
    _actor: &str,
    now: OffsetDateTime,
) -> Result<Incident, AppError> {
    store.apply_transition(
        id,
        &TransitionUpdate {
            from: Status::New,
            to: Status::Acknowledged,
            acknowledged_at: Some(to_rfc3339(now)?),
            resolved_at: None,
        },
    )
}

pub fn resolve(
    store: &dyn IncidentStore,
    id: i64,
    _actor: &str,
    now: OffsetDateTime,
) -> Result<Incident, AppError> {
    store.apply_transition(
        id,
        &TransitionUpdate {
            from: Status::Acknowledged,
            to: Status::Resolved,
            acknowledged_at: None,
            resolved_at: Some(to_rfc3339(now)?),
        },
    )
}

pub fn close(
    store: &dyn IncidentStore,
    id: i64,
    _actor: &str,
    _now: OffsetDateTime,
) -> Result<Incident, AppError> {
    store.apply_transition(
        id,
        &TransitionUpdate {
            from: Status::Resolved,
            to: Status::Closed,
            acknowledged_at: None,
            resolved_at: None,
        },
    )
}

use pretty_assertions::assert_eq;
use time::macros::datetime;
use time::Duration;

use sdesk_core::domain::{Category, Incident, Priority, Status};
use sdesk_core::policy::PriorityPolicy;
use sdesk_core::sla::evaluate;
use sdesk_core::timefmt::to_rfc3339;

fn incident(status: Status, priority: Priority) -> Incident {
    Incident {
        id: 1,
        fingerprint: "fp".to_string(),
        reporter_name: "Ada".to_string(),
        reporter_email: "ada@example.com".to_string(),
        description: "Printer on fire".to_string(),
        category: Category::Hardware,
        priority,
        status,
        created_at: "2026-03-01T09:00:00Z".to_string(),
        acknowledged_at: None,
        resolved_at: None,
    }
}

const T0: time::OffsetDateTime = datetime!(2026-03-01 09:00:00 UTC);

#[test]
fn p1_unacknowledged_past_deadline_is_breached_with_zero_remaining() {
    // P1 ack deadline is 15 minutes; evaluate 20 minutes in while still New.
    let inc = incident(Status::New, Priority::P1);
    let eval = evaluate(&inc, &PriorityPolicy::default(), T0 + Duration::minutes(20)).unwrap();

    assert!(eval.ack_breached);
    assert_eq!(eval.time_remaining_to_ack_seconds, Some(0));
    assert!(!eval.nearing_acknowledgment);
    assert!(!eval.resolve_breached);
    assert_eq!(eval.time_remaining_to_resolve_seconds, None);
}

#[test]
fn breach_is_strictly_greater_than_the_deadline() {
    let inc = incident(Status::New, Priority::P1);
    let policy = PriorityPolicy::default();

    let at_deadline = evaluate(&inc, &policy, T0 + Duration::minutes(15)).unwrap();
    assert!(!at_deadline.ack_breached);
    assert_eq!(at_deadline.time_remaining_to_ack_seconds, Some(0));

    let one_past = evaluate(&inc, &policy, T0 + Duration::minutes(15) + Duration::SECOND).unwrap();
    assert!(one_past.ack_breached);
}

#[test]
fn remaining_time_is_never_negative() {
    let inc = incident(Status::New, Priority::P4);
    let eval = evaluate(&inc, &PriorityPolicy::default(), T0 + Duration::days(30)).unwrap();
    assert_eq!(eval.time_remaining_to_ack_seconds, Some(0));
}

#[test]
fn nearing_acknowledgment_fires_inside_the_warning_window() {
    // P3 ack deadline 2h, warning window 10% = 12 minutes.
    let inc = incident(Status::New, Priority::P3);
    let policy = PriorityPolicy::default();

    let outside = evaluate(&inc, &policy, T0 + Duration::minutes(100)).unwrap();
    assert!(!outside.nearing_acknowledgment);

    let inside = evaluate(&inc, &policy, T0 + Duration::minutes(110)).unwrap();
    assert!(inside.nearing_acknowledgment);
    assert!(!inside.ack_breached);
}

#[test]
fn acknowledged_incident_nears_resolution_within_warning_window() {
    // P1: acknowledged 10 minutes in, evaluated 3h59m after acknowledgment.
    // Resolve deadline is 4h, so 1 minute remains, inside the 24-minute window.
    let mut inc = incident(Status::Acknowledged, Priority::P1);
    inc.acknowledged_at = Some(to_rfc3339(T0 + Duration::minutes(10)).unwrap());

    let now = T0 + Duration::minutes(10) + Duration::hours(3) + Duration::minutes(59);
    let eval = evaluate(&inc, &PriorityPolicy::default(), now).unwrap();

    assert!(!eval.resolve_breached);
    assert_eq!(eval.time_remaining_to_resolve_seconds, Some(60));
    assert!(eval.nearing_resolution);
    assert!(!eval.ack_breached);
}

#[test]
fn acknowledged_incident_freezes_the_ack_verdict() {
    // Acknowledged 20 minutes in: the P1 ack stage was breached at that point
    // and stays breached no matter how much later we evaluate.
    let mut inc = incident(Status::Acknowledged, Priority::P1);
    inc.acknowledged_at = Some(to_rfc3339(T0 + Duration::minutes(20)).unwrap());

    let eval = evaluate(&inc, &PriorityPolicy::default(), T0 + Duration::days(2)).unwrap();
    assert!(eval.ack_breached);
    assert_eq!(eval.time_remaining_to_ack_seconds, Some(0));
    assert!(!eval.nearing_acknowledgment);
}

#[test]
fn resolved_incident_reports_frozen_facts_only() {
    let mut inc = incident(Status::Resolved, Priority::P2);
    inc.acknowledged_at = Some(to_rfc3339(T0 + Duration::minutes(10)).unwrap());
    inc.resolved_at = Some(to_rfc3339(T0 + Duration::hours(9)).unwrap());

    // P2 resolve deadline is 8h; ack-to-resolve took 8h50m.
    let eval = evaluate(&inc, &PriorityPolicy::default(), T0 + Duration::days(10)).unwrap();
    assert!(!eval.ack_breached);
    assert!(eval.resolve_breached);
    assert_eq!(eval.time_remaining_to_ack_seconds, None);
    assert_eq!(eval.time_remaining_to_resolve_seconds, None);
    assert!(!eval.nearing_acknowledgment);
    assert!(!eval.nearing_resolution);
}

#[test]
fn closed_incident_evaluates_like_resolved() {
    let mut resolved = incident(Status::Resolved, Priority::P3);
    resolved.acknowledged_at = Some(to_rfc3339(T0 + Duration::minutes(30)).unwrap());
    resolved.resolved_at = Some(to_rfc3339(T0 + Duration::hours(2)).unwrap());

    let mut closed = resolved.clone();
    closed.status = Status::Closed;

    let policy = PriorityPolicy::default();
    let now = T0 + Duration::days(1);
    assert_eq!(
        evaluate(&resolved, &policy, now).unwrap(),
        evaluate(&closed, &policy, now).unwrap()
    );
}

#[test]
fn evaluation_is_a_pure_function_of_incident_and_now() {
    let mut inc = incident(Status::Acknowledged, Priority::P2);
    inc.acknowledged_at = Some(to_rfc3339(T0 + Duration::minutes(5)).unwrap());

    let policy = PriorityPolicy::default();
    let now = T0 + Duration::hours(3);
    let first = evaluate(&inc, &policy, now).unwrap();
    for _ in 0..5 {
        assert_eq!(evaluate(&inc, &policy, now).unwrap(), first);
    }
}

#[test]
fn acknowledged_without_timestamp_is_surfaced_not_guessed() {
    let inc = incident(Status::Acknowledged, Priority::P1);
    let err = evaluate(&inc, &PriorityPolicy::default(), T0).unwrap_err();
    assert_eq!(err.code, "SLA_TS_MISSING");
}

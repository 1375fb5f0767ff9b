use pretty_assertions::assert_eq;

use sdesk_core::domain::Priority;
use sdesk_core::error::{UNKNOWN_PRIORITY, VALIDATION_FAILED};
use sdesk_core::policy::PriorityPolicy;

#[test]
fn defaults_match_the_published_targets() {
    let policy = PriorityPolicy::default();

    let p1 = policy.deadlines_for(Priority::P1);
    assert_eq!((p1.ack_seconds, p1.resolve_seconds), (15 * 60, 4 * 3600));

    let p2 = policy.deadlines_for(Priority::P2);
    assert_eq!((p2.ack_seconds, p2.resolve_seconds), (30 * 60, 8 * 3600));

    let p3 = policy.deadlines_for(Priority::P3);
    assert_eq!((p3.ack_seconds, p3.resolve_seconds), (2 * 3600, 24 * 3600));

    let p4 = policy.deadlines_for(Priority::P4);
    assert_eq!((p4.ack_seconds, p4.resolve_seconds), (4 * 3600, 72 * 3600));

    assert_eq!(policy.warning_pct(), 10);
}

#[test]
fn json_overrides_are_partial() {
    let policy = PriorityPolicy::from_json(
        r#"{
          "warning_pct": 20,
          "priorities": {
            "P1": { "ack_seconds": 300, "resolve_seconds": 7200 }
          }
        }"#,
    )
    .expect("policy");

    let p1 = policy.deadlines_for(Priority::P1);
    assert_eq!((p1.ack_seconds, p1.resolve_seconds), (300, 7200));
    assert_eq!(policy.warning_pct(), 20);

    // Untouched priorities keep their defaults.
    let p3 = policy.deadlines_for(Priority::P3);
    assert_eq!((p3.ack_seconds, p3.resolve_seconds), (2 * 3600, 24 * 3600));
}

#[test]
fn unknown_priority_keys_are_rejected() {
    let err = PriorityPolicy::from_json(
        r#"{ "warning_pct": null, "priorities": { "P5": { "ack_seconds": 60, "resolve_seconds": 120 } } }"#,
    )
    .unwrap_err();
    assert_eq!(err.code, UNKNOWN_PRIORITY);
}

#[test]
fn non_positive_deadlines_are_rejected() {
    let err = PriorityPolicy::from_json(
        r#"{ "warning_pct": null, "priorities": { "P2": { "ack_seconds": 0, "resolve_seconds": 120 } } }"#,
    )
    .unwrap_err();
    assert_eq!(err.code, VALIDATION_FAILED);
}

#[test]
fn warning_pct_must_be_within_range() {
    let err = PriorityPolicy::from_json(r#"{ "warning_pct": 0, "priorities": {} }"#).unwrap_err();
    assert_eq!(err.code, VALIDATION_FAILED);

    let err = PriorityPolicy::from_json(r#"{ "warning_pct": 101, "priorities": {} }"#).unwrap_err();
    assert_eq!(err.code, VALIDATION_FAILED);
}

#[test]
fn malformed_json_is_a_validation_error() {
    let err = PriorityPolicy::from_json("{ not json").unwrap_err();
    assert_eq!(err.code, VALIDATION_FAILED);
}

#[test]
fn priority_parse_is_case_insensitive_and_total_over_p1_to_p4() {
    assert_eq!(Priority::parse("p1").expect("p1"), Priority::P1);
    assert_eq!(Priority::parse(" P4 ").expect("p4"), Priority::P4);
    assert_eq!(Priority::parse("P9").unwrap_err().code, UNKNOWN_PRIORITY);
    assert_eq!(Priority::parse("urgent").unwrap_err().code, UNKNOWN_PRIORITY);
}

#[test]
fn warning_window_uses_integer_seconds() {
    let policy = PriorityPolicy::default();
    // 10% of the P1 4h resolve deadline is exactly 24 minutes.
    assert_eq!(policy.warning_window_seconds(4 * 3600), 24 * 60);
}

#[test]
fn warning_window_saturates_on_extreme_deadlines() {
    let policy = PriorityPolicy::default();
    assert_eq!(policy.warning_window_seconds(i64::MAX), i64::MAX / 100);

    // With warning_pct = 100 the multiply saturates and the window caps at
    // i64::MAX / 100 instead of wrapping negative.
    let wide = PriorityPolicy::from_json(r#"{ "warning_pct": 100, "priorities": {} }"#)
        .expect("policy");
    assert_eq!(wide.warning_window_seconds(i64::MAX), i64::MAX / 100);
}

#![allow(clippy::unwrap_used, clippy::expect_used)]

use snapq_core::errors::SnapqError;
use snapq_core::logging_facility::test_capture::init_test_capture;
use snapq_core::{log_op_end, log_op_error, log_op_start};
use snapq_core_types::schema::{EVENT_END, EVENT_END_ERROR, EVENT_START};

#[test]
fn test_log_op_start_macro() {
    let capture = init_test_capture();
    let op_name = "test_log_op_start_unique_1";

    log_op_start!(op_name);

    capture.assert_event_exists(op_name, EVENT_START);
}

#[test]
fn test_log_op_end_records_duration() {
    let capture = init_test_capture();
    let op_name = "test_log_op_end_unique_2";

    log_op_end!(op_name, duration_ms = 42);

    let ends: Vec<_> = capture
        .events_for_op(op_name)
        .into_iter()
        .filter(|e| e.event() == Some(EVENT_END))
        .collect();
    assert_eq!(ends.len(), 1, "Should have exactly one end event");
    assert_eq!(ends[0].field("duration_ms"), Some("42"));
}

#[test]
fn test_log_op_error_includes_kind_and_code() {
    let capture = init_test_capture();
    let op_name = "test_log_op_error_unique_3";

    let err = SnapqError::SnapshotMissing {
        repository: "repo".to_string(),
        snapshot: "snap".to_string(),
    };
    log_op_error!(op_name, err, duration_ms = 10);

    let events = capture.events_for_op(op_name);
    let error_event = events
        .iter()
        .find(|e| e.event() == Some(EVENT_END_ERROR))
        .expect("Should have error event");
    assert_eq!(error_event.field("err_code"), Some("ERR_SNAPSHOT_MISSING"));
    assert_eq!(error_event.field("err_kind"), Some("SnapshotMissing"));
    assert_eq!(error_event.field("err_message"), Some("[repo:snap] is missing"));
    assert_eq!(error_event.level, tracing::Level::ERROR);
}

#[test]
fn test_one_start_one_end_per_operation() {
    let capture = init_test_capture();
    let op_name = "test_boundary_unique_4";

    log_op_start!(op_name, repository = "repo-a");
    log_op_end!(op_name, duration_ms = 1, returned = 3usize);

    let events = capture.events_for_op(op_name);
    let starts = events.iter().filter(|e| e.event() == Some(EVENT_START)).count();
    let ends = events.iter().filter(|e| e.event() == Some(EVENT_END)).count();
    assert_eq!(starts, 1);
    assert_eq!(ends, 1);
    assert_eq!(events[0].field("repository"), Some("repo-a"));
    assert_eq!(events[1].field("returned"), Some("3"));
}

#[test]
#[should_panic(expected = "no start event for op")]
fn test_capture_assert_event_exists_fails() {
    let capture = init_test_capture();
    capture.assert_event_exists("nonexistent_op_truly_unique_999", EVENT_START);
}

#[test]
fn test_capture_count_events() {
    let capture = init_test_capture();
    let op1 = "test_count_events_op1_unique_8";
    let op2 = "test_count_events_op2_unique_8";

    log_op_start!(op1);
    log_op_start!(op2);
    log_op_end!(op1, duration_ms = 10);

    let start_count = capture.count_events(|e| {
        e.is(op1, EVENT_START) || e.is(op2, EVENT_START)
    });
    assert_eq!(start_count, 2);
}

#[test]
fn test_events_for_request_narrows_by_request_id() {
    let capture = init_test_capture();
    let op_name = "test_request_narrowing_unique_9";

    log_op_start!(op_name, request_id = "req-narrow-a");
    log_op_start!(op_name, request_id = "req-narrow-b");

    let events = capture.events_for_request("req-narrow-a");
    assert_eq!(events.len(), 1);
    assert!(events[0].is(op_name, EVENT_START));
}

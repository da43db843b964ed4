//! Canonical schema constants for structured logging
//!
//! These constants keep field names consistent between the logging macros,
//! the engine and the test capture layer.

pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";
pub const FIELD_REQUEST_ID: &str = "request_id";
pub const FIELD_TRACE_ID: &str = "trace_id";

// Entity identifiers
pub const FIELD_REPOSITORY: &str = "repository";
pub const FIELD_SNAPSHOT: &str = "snapshot";

// Collection sizes
pub const FIELD_REPO_COUNT: &str = "repo_count";
pub const FIELD_CANDIDATE_COUNT: &str = "candidate_count";
pub const FIELD_RETURNED: &str = "returned";
pub const FIELD_REMAINING: &str = "remaining";
pub const FIELD_FAILURES: &str = "failures";

// Error fields
pub const FIELD_ERR_KIND: &str = "err_kind";
pub const FIELD_ERR_CODE: &str = "err_code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_names_are_distinct() {
        assert_ne!(EVENT_START, EVENT_END);
        assert_ne!(EVENT_START, EVENT_END_ERROR);
        assert_ne!(EVENT_END, EVENT_END_ERROR);
    }

    #[test]
    fn test_error_fields_match_macro_field_names() {
        // log_op_error! writes `err_kind` / `err_code` as bare identifiers
        assert_eq!(FIELD_ERR_KIND, "err_kind");
        assert_eq!(FIELD_ERR_CODE, "err_code");
    }
}

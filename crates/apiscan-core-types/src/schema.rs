//! Canonical schema constants for structured logging and events
//!
//! These constants keep field names identical between the emitting macros,
//! the engine boundary and the test capture layer.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";

// Scan boundary
pub const FIELD_ARTIFACT: &str = "artifact";
pub const FIELD_ARTIFACT_COUNT: &str = "artifact_count";
pub const FIELD_ENTITY_COUNT: &str = "entity_count";
pub const FIELD_REJECTED_COUNT: &str = "rejected_count";

// Compare boundary
pub const FIELD_CHANGE_COUNT: &str = "change_count";
pub const FIELD_HIGHEST: &str = "highest";

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
    fn test_field_names_are_snake_case() {
        let fields = [
            FIELD_COMPONENT,
            FIELD_OP,
            FIELD_EVENT,
            FIELD_DURATION_MS,
            FIELD_ARTIFACT,
            FIELD_ARTIFACT_COUNT,
            FIELD_ENTITY_COUNT,
            FIELD_REJECTED_COUNT,
            FIELD_CHANGE_COUNT,
            FIELD_HIGHEST,
            FIELD_ERR_KIND,
            FIELD_ERR_CODE,
        ];
        for field in fields {
            assert!(!field.is_empty());
            assert!(field.chars().all(|c| c.is_ascii_lowercase() || c == '_'), "{}", field);
        }
    }

    #[test]
    fn test_event_names_are_distinct() {
        assert_ne!(EVENT_START, EVENT_END);
        assert_ne!(EVENT_START, EVENT_END_ERROR);
        assert_ne!(EVENT_END, EVENT_END_ERROR);
    }
}

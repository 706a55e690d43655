//! Canonical schema constants for structured logging and events
//!
//! These constants ensure consistency across all logging and error reporting.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";

// Snapshot identifiers
pub const FIELD_SNAPSHOT_PATH: &str = "snapshot_path";
pub const FIELD_RECORD_MODE: &str = "record_mode";
pub const FIELD_ORDINAL: &str = "ordinal";
pub const FIELD_ARTIFACT_KIND: &str = "artifact_kind";
pub const FIELD_BYTES: &str = "bytes";
pub const FIELD_DIGEST: &str = "digest";
pub const FIELD_ACTION: &str = "action";

// Error fields
pub const FIELD_ERR_KIND: &str = "err_kind";
pub const FIELD_ERR_CODE: &str = "err_code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";

// Canonical operation names
pub const OP_VERIFY_SNAPSHOT: &str = "verify_snapshot";
pub const OP_WRITE_REFERENCE: &str = "write_reference";
pub const OP_READ_REFERENCE: &str = "read_reference";
pub const OP_WRITE_ARTIFACT: &str = "write_artifact";

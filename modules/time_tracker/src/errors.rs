//! Error catalog of the time_tracker module.
use modkit_errors::ErrDef;

pub const VALIDATION: ErrDef = ErrDef::new(400, "Validation error", "TIME_TRACKER_VALIDATION");
pub const INVALID_PAYLOAD: ErrDef = ErrDef::new(
    400,
    "Invalid request payload",
    "TIME_TRACKER_INVALID_PAYLOAD",
);
pub const USER_NOT_FOUND: ErrDef = ErrDef::new(404, "User not found", "TIME_TRACKER_USER_NOT_FOUND");
pub const NO_ACTIVE_INTERVAL: ErrDef = ErrDef::new(
    404,
    "No active task",
    "TIME_TRACKER_NO_ACTIVE_INTERVAL",
);
pub const INTERVAL_ALREADY_OPEN: ErrDef = ErrDef::new(
    409,
    "Task already started",
    "TIME_TRACKER_INTERVAL_ALREADY_OPEN",
);
pub const USER_HAS_INTERVALS: ErrDef = ErrDef::new(
    409,
    "User has work intervals",
    "TIME_TRACKER_USER_HAS_INTERVALS",
);
pub const INTERNAL_DB: ErrDef = ErrDef::new(500, "Internal error", "TIME_TRACKER_INTERNAL_DB");

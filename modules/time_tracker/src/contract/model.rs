use chrono::{DateTime, Utc};

/// Pure user model for inter-module communication (no serde/schemars)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i32,
    pub passport_serie: String,
    pub passport_number: String,
    pub surname: String,
    pub name: String,
    pub patronymic: Option<String>,
    pub address: String,
}

/// Data for creating a user: a combined passport string such as `"1234 567890"`.
/// Every other attribute is resolved by the identity lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub passport: String,
}

/// Full replacement of a user's attributes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserUpdate {
    pub passport_serie: String,
    pub passport_number: String,
    pub surname: String,
    pub name: String,
    pub patronymic: Option<String>,
    pub address: String,
}

/// Listing parameters. Missing `limit` means the configured default page size.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UserFilter {
    /// Literal substring matched against name or surname. Case handling follows the
    /// database: ASCII case-insensitive on SQLite, case-sensitive on Postgres.
    pub filter: Option<String>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

/// A period of work by one user on one task. `end_time == None` means the
/// interval is still open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkInterval {
    pub id: i32,
    pub user_id: i32,
    pub task_id: i32,
    pub description: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
}

/// Request to open an interval for `(user_id, task_id)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartInterval {
    pub user_id: i32,
    pub task_id: i32,
    pub description: Option<String>,
}

/// Closed reporting window; both bounds are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoursWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Total hours one user spent on one task inside a window
#[derive(Debug, Clone, PartialEq)]
pub struct TaskHoursSummary {
    pub task_id: i32,
    pub hours: f64,
}

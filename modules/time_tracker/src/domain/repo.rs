use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::contract::model::{HoursWindow, User, UserUpdate, WorkInterval};

/// Attributes of a user about to be persisted; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUserRecord {
    pub passport_serie: String,
    pub passport_number: String,
    pub surname: String,
    pub name: String,
    pub patronymic: Option<String>,
    pub address: String,
}

/// Outcome of deleting a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    NotFound,
    /// Intervals reference the user; nothing was removed.
    HasIntervals,
}

/// Attributes of an interval about to be opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewIntervalRecord {
    pub user_id: i32,
    pub task_id: i32,
    pub description: Option<String>,
    pub start_time: DateTime<Utc>,
}

/// Outcome of an "open unless already open" insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpenOutcome {
    Opened(WorkInterval),
    /// An open interval already exists for the pair.
    AlreadyOpen,
    UnknownUser,
}

/// Outcome of an atomic "close the open interval" update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloseOutcome {
    /// The oldest open interval was closed; `still_open` counts any others
    /// left open for the same pair.
    Closed {
        interval: WorkInterval,
        still_open: usize,
    },
    NothingOpen,
}

/// Port for the domain layer: user persistence.
/// Object-safe and async-friendly via `async_trait`.
#[async_trait]
pub trait UsersRepository: Send + Sync {
    /// Insert a user and return it with the generated id.
    async fn insert(&self, u: NewUserRecord) -> anyhow::Result<User>;
    /// Replace all attributes. `None` when no such user exists.
    async fn update(&self, id: i32, u: UserUpdate) -> anyhow::Result<Option<User>>;
    /// Delete a user that has no intervals.
    async fn delete(&self, id: i32) -> anyhow::Result<DeleteOutcome>;
    /// Users ordered by id; `filter` is a substring of name or surname.
    async fn list(&self, filter: Option<&str>, limit: u64, offset: u64)
        -> anyhow::Result<Vec<User>>;
}

/// Port for the domain layer: work interval persistence.
///
/// Both mutating operations are atomic with respect to concurrent callers on the
/// same `(user_id, task_id)` pair.
#[async_trait]
pub trait IntervalsRepository: Send + Sync {
    /// Open an interval unless one is already open for the pair.
    async fn open(&self, rec: NewIntervalRecord) -> anyhow::Result<OpenOutcome>;
    /// Close the oldest open interval for the pair at `end_time`.
    async fn close_open(
        &self,
        user_id: i32,
        task_id: i32,
        end_time: DateTime<Utc>,
    ) -> anyhow::Result<CloseOutcome>;
    /// Closed intervals of a user with `start >= window.start` and
    /// `end <= window.end`, ordered by id.
    async fn closed_in_window(
        &self,
        user_id: i32,
        window: HoursWindow,
    ) -> anyhow::Result<Vec<WorkInterval>>;
}

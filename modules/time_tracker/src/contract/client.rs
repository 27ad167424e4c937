use async_trait::async_trait;

use crate::contract::{
    error::TimeTrackerError,
    model::{
        HoursWindow, NewUser, StartInterval, TaskHoursSummary, User, UserFilter, UserUpdate,
        WorkInterval,
    },
};

/// Public API trait for the time_tracker module that other modules can use
#[async_trait]
pub trait TimeTrackerApi: Send + Sync {
    /// Create a user from a passport string, enriched by the identity lookup
    async fn create_user(&self, new_user: NewUser) -> Result<User, TimeTrackerError>;

    /// Replace every attribute of an existing user
    async fn update_user(&self, id: i32, update: UserUpdate) -> Result<User, TimeTrackerError>;

    /// Delete a user by ID
    async fn delete_user(&self, id: i32) -> Result<(), TimeTrackerError>;

    /// List users ordered by ID with optional name filter and paging
    async fn list_users(&self, filter: UserFilter) -> Result<Vec<User>, TimeTrackerError>;

    /// Open a work interval for a (user, task) pair
    async fn start_interval(&self, req: StartInterval) -> Result<WorkInterval, TimeTrackerError>;

    /// Close the open work interval for a (user, task) pair
    async fn stop_interval(
        &self,
        user_id: i32,
        task_id: i32,
    ) -> Result<WorkInterval, TimeTrackerError>;

    /// Per-task hour totals for a user inside a window, largest first
    async fn task_hours(
        &self,
        user_id: i32,
        window: HoursWindow,
    ) -> Result<Vec<TaskHoursSummary>, TimeTrackerError>;
}

use async_trait::async_trait;
use std::sync::Arc;

use crate::contract::{
    client::TimeTrackerApi,
    error::TimeTrackerError,
    model::{
        HoursWindow, NewUser, StartInterval, TaskHoursSummary, User, UserFilter, UserUpdate,
        WorkInterval,
    },
};
use crate::domain::service::Service;

/// Local implementation of the TimeTrackerApi trait that delegates to the domain service
pub struct TimeTrackerLocalClient {
    service: Arc<Service>,
}

impl TimeTrackerLocalClient {
    pub fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl TimeTrackerApi for TimeTrackerLocalClient {
    async fn create_user(&self, new_user: NewUser) -> Result<User, TimeTrackerError> {
        self.service.create_user(new_user).await.map_err(Into::into)
    }

    async fn update_user(&self, id: i32, update: UserUpdate) -> Result<User, TimeTrackerError> {
        self.service
            .update_user(id, update)
            .await
            .map_err(Into::into)
    }

    async fn delete_user(&self, id: i32) -> Result<(), TimeTrackerError> {
        self.service.delete_user(id).await.map_err(Into::into)
    }

    async fn list_users(&self, filter: UserFilter) -> Result<Vec<User>, TimeTrackerError> {
        self.service.list_users(filter).await.map_err(Into::into)
    }

    async fn start_interval(&self, req: StartInterval) -> Result<WorkInterval, TimeTrackerError> {
        self.service.start_interval(req).await.map_err(Into::into)
    }

    async fn stop_interval(
        &self,
        user_id: i32,
        task_id: i32,
    ) -> Result<WorkInterval, TimeTrackerError> {
        self.service
            .stop_interval(user_id, task_id)
            .await
            .map_err(Into::into)
    }

    async fn task_hours(
        &self,
        user_id: i32,
        window: HoursWindow,
    ) -> Result<Vec<TaskHoursSummary>, TimeTrackerError> {
        self.service
            .task_hours(user_id, window)
            .await
            .map_err(Into::into)
    }
}

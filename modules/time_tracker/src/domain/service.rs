use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::contract::model::{
    HoursWindow, NewUser, StartInterval, TaskHoursSummary, User, UserFilter, UserUpdate,
    WorkInterval,
};
use crate::domain::clock::Clock;
use crate::domain::enrichment::IdentityEnrichment;
use crate::domain::error::DomainError;
use crate::domain::hours::HoursAggregator;
use crate::domain::passport::Passport;
use crate::domain::ports::IdentityPort;
use crate::domain::repo::{DeleteOutcome, IntervalsRepository, NewUserRecord, UsersRepository};
use crate::domain::tracker::IntervalTracker;

/// Domain service with business rules for users and work intervals.
/// Depends only on ports, not on infra types.
#[derive(Clone)]
pub struct Service {
    users: Arc<dyn UsersRepository>,
    enrichment: IdentityEnrichment,
    tracker: IntervalTracker,
    hours: HoursAggregator,
    config: ServiceConfig,
}

/// Configuration for the domain service
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub default_page_size: u64,
    pub max_page_size: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            default_page_size: 50,
            max_page_size: 1000,
        }
    }
}

impl Service {
    /// Create a service with dependencies.
    pub fn new(
        users: Arc<dyn UsersRepository>,
        intervals: Arc<dyn IntervalsRepository>,
        identity: Arc<dyn IdentityPort>,
        clock: Arc<dyn Clock>,
        config: ServiceConfig,
    ) -> Self {
        Self {
            users,
            enrichment: IdentityEnrichment::new(identity),
            tracker: IntervalTracker::new(intervals.clone(), clock),
            hours: HoursAggregator::new(intervals),
            config,
        }
    }

    #[instrument(name = "time_tracker.service.create_user", skip_all)]
    pub async fn create_user(&self, new_user: NewUser) -> Result<User, DomainError> {
        let passport = Passport::parse(&new_user.passport)?;
        let profile = self.enrichment.resolve(&passport).await;

        let user = self
            .users
            .insert(NewUserRecord {
                passport_serie: passport.serie().to_owned(),
                passport_number: passport.number().to_owned(),
                surname: profile.surname,
                name: profile.name,
                patronymic: profile.patronymic,
                address: profile.address,
            })
            .await
            .map_err(|e| DomainError::database(format!("{e:#}")))?;

        info!(user_id = user.id, "user created");
        Ok(user)
    }

    #[instrument(name = "time_tracker.service.update_user", skip(self, update), fields(user_id = id))]
    pub async fn update_user(&self, id: i32, update: UserUpdate) -> Result<User, DomainError> {
        Passport::from_parts(&update.passport_serie, &update.passport_number)?;

        let user = self
            .users
            .update(id, update)
            .await
            .map_err(|e| DomainError::database(format!("{e:#}")))?
            .ok_or_else(|| DomainError::user_not_found(id))?;

        info!("user updated");
        Ok(user)
    }

    #[instrument(name = "time_tracker.service.delete_user", skip(self), fields(user_id = id))]
    pub async fn delete_user(&self, id: i32) -> Result<(), DomainError> {
        match self
            .users
            .delete(id)
            .await
            .map_err(|e| DomainError::database(format!("{e:#}")))?
        {
            DeleteOutcome::Deleted => {
                info!("user deleted");
                Ok(())
            }
            DeleteOutcome::NotFound => Err(DomainError::user_not_found(id)),
            DeleteOutcome::HasIntervals => Err(DomainError::user_has_intervals(id)),
        }
    }

    #[instrument(name = "time_tracker.service.list_users", skip(self))]
    pub async fn list_users(&self, filter: UserFilter) -> Result<Vec<User>, DomainError> {
        let limit = filter.limit.unwrap_or(self.config.default_page_size);
        if limit > self.config.max_page_size {
            return Err(DomainError::validation(
                "limit",
                format!("must not exceed {}", self.config.max_page_size),
            ));
        }
        let offset = filter.offset.unwrap_or(0);
        let needle = filter.filter.as_deref().filter(|s| !s.is_empty());

        let users = self
            .users
            .list(needle, limit, offset)
            .await
            .map_err(|e| DomainError::database(format!("{e:#}")))?;

        debug!(count = users.len(), "listed users");
        Ok(users)
    }

    #[instrument(
        name = "time_tracker.service.start_interval",
        skip(self, req),
        fields(user_id = req.user_id, task_id = req.task_id)
    )]
    pub async fn start_interval(&self, req: StartInterval) -> Result<WorkInterval, DomainError> {
        self.tracker.start(req).await
    }

    #[instrument(name = "time_tracker.service.stop_interval", skip(self))]
    pub async fn stop_interval(
        &self,
        user_id: i32,
        task_id: i32,
    ) -> Result<WorkInterval, DomainError> {
        self.tracker.stop(user_id, task_id).await
    }

    #[instrument(
        name = "time_tracker.service.task_hours",
        skip(self, window),
        fields(window_start = %window.start, window_end = %window.end)
    )]
    pub async fn task_hours(
        &self,
        user_id: i32,
        window: HoursWindow,
    ) -> Result<Vec<TaskHoursSummary>, DomainError> {
        let summary = self.hours.task_hours(user_id, window).await?;
        debug!(tasks = summary.len(), "hours summarized");
        Ok(summary)
    }
}

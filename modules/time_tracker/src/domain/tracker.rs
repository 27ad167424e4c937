use std::sync::Arc;

use tracing::{debug, error, info};

use crate::contract::model::{StartInterval, WorkInterval};
use crate::domain::clock::Clock;
use crate::domain::error::DomainError;
use crate::domain::repo::{CloseOutcome, IntervalsRepository, NewIntervalRecord, OpenOutcome};

/// Start/stop state machine over work intervals.
///
/// Per `(user_id, task_id)`: Closed -> start -> Open -> stop -> Closed.
/// Starting an already open pair is rejected.
#[derive(Clone)]
pub struct IntervalTracker {
    repo: Arc<dyn IntervalsRepository>,
    clock: Arc<dyn Clock>,
}

impl IntervalTracker {
    pub fn new(repo: Arc<dyn IntervalsRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { repo, clock }
    }

    pub async fn start(&self, req: StartInterval) -> Result<WorkInterval, DomainError> {
        let (user_id, task_id) = (req.user_id, req.task_id);
        let rec = NewIntervalRecord {
            user_id,
            task_id,
            description: req.description,
            start_time: self.clock.now(),
        };

        match self
            .repo
            .open(rec)
            .await
            .map_err(|e| DomainError::database(format!("{e:#}")))?
        {
            OpenOutcome::Opened(interval) => {
                info!(interval_id = interval.id, "work interval opened");
                Ok(interval)
            }
            OpenOutcome::AlreadyOpen => {
                debug!("start rejected, interval already open");
                Err(DomainError::duplicate_open_interval(user_id, task_id))
            }
            OpenOutcome::UnknownUser => Err(DomainError::user_not_found(user_id)),
        }
    }

    pub async fn stop(&self, user_id: i32, task_id: i32) -> Result<WorkInterval, DomainError> {
        match self
            .repo
            .close_open(user_id, task_id, self.clock.now())
            .await
            .map_err(|e| DomainError::database(format!("{e:#}")))?
        {
            CloseOutcome::Closed {
                interval,
                still_open,
            } => {
                if still_open > 0 {
                    error!(
                        user_id,
                        task_id,
                        still_open,
                        closed_id = interval.id,
                        "more than one open interval for the pair, closed the oldest"
                    );
                }
                info!(interval_id = interval.id, "work interval closed");
                Ok(interval)
            }
            CloseOutcome::NothingOpen => Err(DomainError::no_active_interval(user_id, task_id)),
        }
    }
}

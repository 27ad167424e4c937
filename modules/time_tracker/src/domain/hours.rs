use std::collections::hash_map::{Entry, HashMap};
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::contract::model::{HoursWindow, TaskHoursSummary, WorkInterval};
use crate::domain::error::DomainError;
use crate::domain::repo::IntervalsRepository;

const MICROS_PER_HOUR: f64 = 3_600_000_000.0;

/// Read-only per-task hour totals.
#[derive(Clone)]
pub struct HoursAggregator {
    repo: Arc<dyn IntervalsRepository>,
}

impl HoursAggregator {
    pub fn new(repo: Arc<dyn IntervalsRepository>) -> Self {
        Self { repo }
    }

    pub async fn task_hours(
        &self,
        user_id: i32,
        window: HoursWindow,
    ) -> Result<Vec<TaskHoursSummary>, DomainError> {
        if window.start > window.end {
            return Err(DomainError::validation(
                "start_date",
                "must not be after end_date",
            ));
        }

        let intervals = self
            .repo
            .closed_in_window(user_id, window)
            .await
            .map_err(|e| DomainError::database(format!("{e:#}")))?;

        Ok(summarize(&intervals))
    }
}

/// Group closed intervals by task and sum their durations in hours, largest total first.
///
/// Open intervals are skipped. Equal totals keep the order in which their task first
/// appears in `intervals`.
pub fn summarize(intervals: &[WorkInterval]) -> Vec<TaskHoursSummary> {
    let mut totals: Vec<TaskHoursSummary> = Vec::new();
    let mut slot_by_task: HashMap<i32, usize> = HashMap::new();

    for interval in intervals {
        let Some(end) = interval.end_time else {
            continue;
        };
        let hours = hours_between(interval.start_time, end);
        match slot_by_task.entry(interval.task_id) {
            Entry::Occupied(slot) => totals[*slot.get()].hours += hours,
            Entry::Vacant(slot) => {
                slot.insert(totals.len());
                totals.push(TaskHoursSummary {
                    task_id: interval.task_id,
                    hours,
                });
            }
        }
    }

    totals.sort_by(|a, b| b.hours.total_cmp(&a.hours));
    totals
}

fn hours_between(start: DateTime<Utc>, end: DateTime<Utc>) -> f64 {
    let span = end - start;
    // Microseconds overflow only past ~292k years; fall back to milliseconds there.
    match span.num_microseconds() {
        Some(us) => us as f64 / MICROS_PER_HOUR,
        None => span.num_milliseconds() as f64 / (MICROS_PER_HOUR / 1000.0),
    }
}

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::contract::model::{
    HoursWindow, NewUser, StartInterval, TaskHoursSummary, User, UserFilter, UserUpdate,
    WorkInterval,
};
use crate::domain::error::DomainError;

/// REST DTO for user representation with serde/utoipa
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: i32,
    pub passport_serie: String,
    pub passport_number: String,
    pub surname: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patronymic: Option<String>,
    pub address: String,
}

/// REST DTO for creating a user
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserReq {
    /// Series and number separated by a single space
    #[schema(example = "1234 567890")]
    pub passport_number: String,
}

/// REST DTO for replacing all attributes of a user
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserReq {
    #[schema(example = "1234")]
    pub passport_serie: String,
    #[schema(example = "567890")]
    pub passport_number: String,
    pub surname: String,
    pub name: String,
    #[serde(default)]
    pub patronymic: Option<String>,
    pub address: String,
}

/// Query parameters of the user listing
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListUsersQuery {
    /// Substring of name or surname
    pub filter: Option<String>,
    /// Page size; defaults to the configured page size
    pub limit: Option<u64>,
    /// Number of users to skip
    pub offset: Option<u64>,
}

/// REST DTO for starting a task
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StartIntervalReq {
    #[serde(rename = "userID")]
    pub user_id: i32,
    #[serde(rename = "taskID")]
    pub task_id: i32,
    #[serde(default)]
    pub description: Option<String>,
}

/// REST DTO for stopping a task
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StopIntervalReq {
    #[serde(rename = "userID")]
    pub user_id: i32,
    #[serde(rename = "taskID")]
    pub task_id: i32,
}

/// REST DTO for a work interval
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct WorkIntervalDto {
    pub id: i32,
    #[serde(rename = "userID")]
    pub user_id: i32,
    #[serde(rename = "taskID")]
    pub task_id: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "startTime")]
    pub start_time: DateTime<Utc>,
    #[serde(rename = "endTime", default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
}

/// Query parameters of the hours summary
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct HoursQuery {
    pub user_id: i32,
    /// `YYYY-MM-DD` (start of day, UTC) or an RFC 3339 timestamp
    pub start_date: String,
    /// `YYYY-MM-DD` (whole day included) or an RFC 3339 timestamp
    pub end_date: String,
}

/// REST DTO for one row of the hours summary
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TaskHoursDto {
    #[serde(rename = "taskID")]
    pub task_id: i32,
    pub hours: f64,
}

// Conversion implementations between REST DTOs and contract models

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            passport_serie: user.passport_serie,
            passport_number: user.passport_number,
            surname: user.surname,
            name: user.name,
            patronymic: user.patronymic,
            address: user.address,
        }
    }
}

impl From<CreateUserReq> for NewUser {
    fn from(req: CreateUserReq) -> Self {
        Self {
            passport: req.passport_number,
        }
    }
}

impl From<UpdateUserReq> for UserUpdate {
    fn from(req: UpdateUserReq) -> Self {
        Self {
            passport_serie: req.passport_serie,
            passport_number: req.passport_number,
            surname: req.surname,
            name: req.name,
            patronymic: req.patronymic,
            address: req.address,
        }
    }
}

impl From<ListUsersQuery> for UserFilter {
    fn from(q: ListUsersQuery) -> Self {
        Self {
            filter: q.filter,
            limit: q.limit,
            offset: q.offset,
        }
    }
}

impl From<StartIntervalReq> for StartInterval {
    fn from(req: StartIntervalReq) -> Self {
        Self {
            user_id: req.user_id,
            task_id: req.task_id,
            description: req.description,
        }
    }
}

impl From<WorkInterval> for WorkIntervalDto {
    fn from(w: WorkInterval) -> Self {
        Self {
            id: w.id,
            user_id: w.user_id,
            task_id: w.task_id,
            description: w.description,
            start_time: w.start_time,
            end_time: w.end_time,
        }
    }
}

impl From<TaskHoursSummary> for TaskHoursDto {
    fn from(s: TaskHoursSummary) -> Self {
        Self {
            task_id: s.task_id,
            hours: s.hours,
        }
    }
}

impl HoursQuery {
    /// Resolve the textual bounds into an inclusive UTC window.
    pub fn window(&self) -> Result<HoursWindow, DomainError> {
        Ok(HoursWindow {
            start: parse_bound("start_date", &self.start_date, false)?,
            end: parse_bound("end_date", &self.end_date, true)?,
        })
    }
}

/// A plain date is midnight UTC; as an upper bound it moves to the next midnight so the
/// whole day is covered.
fn parse_bound(field: &str, raw: &str, upper: bool) -> Result<DateTime<Utc>, DomainError> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }

    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
        DomainError::validation(field, "expected YYYY-MM-DD or an RFC 3339 timestamp")
    })?;
    let day = if upper {
        date.succ_opt()
            .ok_or_else(|| DomainError::validation(field, "date out of range"))?
    } else {
        date
    };
    Ok(day.and_time(NaiveTime::MIN).and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn query(start: &str, end: &str) -> HoursQuery {
        HoursQuery {
            user_id: 1,
            start_date: start.into(),
            end_date: end.into(),
        }
    }

    #[test]
    fn plain_dates_cover_whole_days() {
        let w = query("2024-01-01", "2024-01-31").window().unwrap();
        assert_eq!(w.start, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        assert_eq!(w.end, Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn rfc3339_is_taken_verbatim_and_normalized_to_utc() {
        let w = query("2024-01-01T10:00:00+02:00", "2024-01-01T18:30:00Z")
            .window()
            .unwrap();
        assert_eq!(w.start, Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap());
        assert_eq!(w.end, Utc.with_ymd_and_hms(2024, 1, 1, 18, 30, 0).unwrap());
    }

    #[test]
    fn garbage_dates_name_the_field() {
        match query("yesterday", "2024-01-01").window() {
            Err(DomainError::Validation { field, .. }) => assert_eq!(field, "start_date"),
            other => panic!("unexpected: {other:?}"),
        }
        match query("2024-01-01", "2024-13-01").window() {
            Err(DomainError::Validation { field, .. }) => assert_eq!(field, "end_date"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn interval_dto_uses_wire_names() {
        let dto = WorkIntervalDto::from(WorkInterval {
            id: 3,
            user_id: 1,
            task_id: 7,
            description: None,
            start_time: Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap(),
            end_time: None,
        });
        let v = serde_json::to_value(dto).unwrap();
        assert_eq!(v["userID"], 1);
        assert_eq!(v["taskID"], 7);
        assert!(v.get("startTime").is_some());
        assert!(v.get("endTime").is_none());
        assert!(v.get("description").is_none());
    }

    #[test]
    fn user_dto_uses_camel_case() {
        let dto = UserDto::from(User {
            id: 1,
            passport_serie: "0012".into(),
            passport_number: "000345".into(),
            surname: "Ivanov".into(),
            name: "Ivan".into(),
            patronymic: Some("Ivanovich".into()),
            address: "Moscow".into(),
        });
        let v = serde_json::to_value(dto).unwrap();
        assert_eq!(v["passportSerie"], "0012");
        assert_eq!(v["passportNumber"], "000345");
        assert_eq!(v["patronymic"], "Ivanovich");
    }
}

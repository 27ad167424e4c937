use utoipa::OpenApi;

use crate::api::rest::{dto, handlers};
use modkit::api::problem::{Problem, ValidationError};

#[derive(OpenApi)]
#[openapi(
    info(title = "Time Tracker API", description = "Users, task timers and worked hours"),
    paths(
        handlers::list_users,
        handlers::create_user,
        handlers::update_user,
        handlers::delete_user,
        handlers::start_interval,
        handlers::stop_interval,
        handlers::task_hours,
    ),
    components(schemas(
        dto::UserDto,
        dto::CreateUserReq,
        dto::UpdateUserReq,
        dto::StartIntervalReq,
        dto::StopIntervalReq,
        dto::WorkIntervalDto,
        dto::TaskHoursDto,
        Problem,
        ValidationError,
    )),
    tags(
        (name = "users", description = "User records enriched from the identity service"),
        (name = "tasks", description = "Start and stop work intervals"),
        (name = "worklogs", description = "Worked hours per task"),
    )
)]
pub struct TimeTrackerApiDoc;

/// The module's OpenAPI document
pub fn openapi() -> utoipa::openapi::OpenApi {
    TimeTrackerApiDoc::openapi()
}

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query,
    },
    http::{StatusCode, Uri},
    response::Json,
    Extension,
};
use tracing::{error, info};

use crate::api::rest::dto::{
    CreateUserReq, HoursQuery, ListUsersQuery, StartIntervalReq, StopIntervalReq, TaskHoursDto,
    UpdateUserReq, UserDto, WorkIntervalDto,
};
use crate::api::rest::error::{
    map_domain_error, map_json_rejection, map_path_rejection, map_query_rejection,
};
use crate::domain::service::Service;
use modkit::api::problem::{Problem, ProblemResponse};

/// List users, optionally filtered by name or surname
#[utoipa::path(
    get,
    path = "/users",
    tag = "users",
    params(ListUsersQuery),
    responses(
        (status = 200, description = "Users ordered by id", body = [UserDto]),
        (status = 400, description = "Bad Request", body = Problem, content_type = "application/problem+json"),
        (status = 500, description = "Internal Server Error", body = Problem, content_type = "application/problem+json"),
    )
)]
pub async fn list_users(
    Extension(svc): Extension<Arc<Service>>,
    uri: Uri,
    query: Result<Query<ListUsersQuery>, QueryRejection>,
) -> Result<Json<Vec<UserDto>>, ProblemResponse> {
    let Query(query) = query.map_err(|r| map_query_rejection(&r, uri.path()))?;
    info!("Listing users with query: {:?}", query);

    match svc.list_users(query.into()).await {
        Ok(users) => Ok(Json(users.into_iter().map(UserDto::from).collect())),
        Err(e) => {
            error!("Failed to list users: {}", e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

/// Create a user from a passport number; personal data comes from the identity service
#[utoipa::path(
    post,
    path = "/users",
    tag = "users",
    request_body = CreateUserReq,
    responses(
        (status = 201, description = "Created user", body = UserDto),
        (status = 400, description = "Bad Request", body = Problem, content_type = "application/problem+json"),
        (status = 500, description = "Internal Server Error", body = Problem, content_type = "application/problem+json"),
    )
)]
pub async fn create_user(
    Extension(svc): Extension<Arc<Service>>,
    uri: Uri,
    payload: Result<Json<CreateUserReq>, JsonRejection>,
) -> Result<(StatusCode, Json<UserDto>), ProblemResponse> {
    let Json(req_body) = payload.map_err(|r| map_json_rejection(&r, uri.path()))?;
    info!("Creating user");

    match svc.create_user(req_body.into()).await {
        Ok(user) => Ok((StatusCode::CREATED, Json(UserDto::from(user)))),
        Err(e) => {
            error!("Failed to create user: {}", e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

/// Replace all attributes of a user
#[utoipa::path(
    put,
    path = "/users/{id}",
    tag = "users",
    params(("id" = i32, Path, description = "User id")),
    request_body = UpdateUserReq,
    responses(
        (status = 200, description = "Updated user", body = UserDto),
        (status = 400, description = "Bad Request", body = Problem, content_type = "application/problem+json"),
        (status = 404, description = "Not Found", body = Problem, content_type = "application/problem+json"),
        (status = 500, description = "Internal Server Error", body = Problem, content_type = "application/problem+json"),
    )
)]
pub async fn update_user(
    Extension(svc): Extension<Arc<Service>>,
    path: Result<Path<i32>, PathRejection>,
    uri: Uri,
    payload: Result<Json<UpdateUserReq>, JsonRejection>,
) -> Result<Json<UserDto>, ProblemResponse> {
    let Path(id) = path.map_err(|r| map_path_rejection(&r, uri.path()))?;
    let Json(req_body) = payload.map_err(|r| map_json_rejection(&r, uri.path()))?;
    info!("Updating user {}", id);

    match svc.update_user(id, req_body.into()).await {
        Ok(user) => Ok(Json(UserDto::from(user))),
        Err(e) => {
            error!("Failed to update user {}: {}", id, e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

/// Delete a user without recorded work
#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = "users",
    params(("id" = i32, Path, description = "User id")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 400, description = "Bad Request", body = Problem, content_type = "application/problem+json"),
        (status = 404, description = "Not Found", body = Problem, content_type = "application/problem+json"),
        (status = 409, description = "User still has work intervals", body = Problem, content_type = "application/problem+json"),
        (status = 500, description = "Internal Server Error", body = Problem, content_type = "application/problem+json"),
    )
)]
pub async fn delete_user(
    Extension(svc): Extension<Arc<Service>>,
    path: Result<Path<i32>, PathRejection>,
    uri: Uri,
) -> Result<StatusCode, ProblemResponse> {
    let Path(id) = path.map_err(|r| map_path_rejection(&r, uri.path()))?;
    info!("Deleting user: {}", id);

    match svc.delete_user(id).await {
        Ok(()) => Ok(StatusCode::NO_CONTENT),
        Err(e) => {
            error!("Failed to delete user {}: {}", id, e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

/// Start tracking time on a task
#[utoipa::path(
    post,
    path = "/tasks/start",
    tag = "tasks",
    request_body = StartIntervalReq,
    responses(
        (status = 201, description = "Opened interval", body = WorkIntervalDto),
        (status = 400, description = "Bad Request", body = Problem, content_type = "application/problem+json"),
        (status = 404, description = "Unknown user", body = Problem, content_type = "application/problem+json"),
        (status = 409, description = "Task already in progress", body = Problem, content_type = "application/problem+json"),
        (status = 500, description = "Internal Server Error", body = Problem, content_type = "application/problem+json"),
    )
)]
pub async fn start_interval(
    Extension(svc): Extension<Arc<Service>>,
    uri: Uri,
    payload: Result<Json<StartIntervalReq>, JsonRejection>,
) -> Result<(StatusCode, Json<WorkIntervalDto>), ProblemResponse> {
    let Json(req_body) = payload.map_err(|r| map_json_rejection(&r, uri.path()))?;
    info!(
        "Starting task {} for user {}",
        req_body.task_id, req_body.user_id
    );

    match svc.start_interval(req_body.into()).await {
        Ok(interval) => Ok((StatusCode::CREATED, Json(WorkIntervalDto::from(interval)))),
        Err(e) => {
            error!("Failed to start task: {}", e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

/// Stop tracking time on a task
#[utoipa::path(
    post,
    path = "/tasks/stop",
    tag = "tasks",
    request_body = StopIntervalReq,
    responses(
        (status = 200, description = "Closed interval", body = WorkIntervalDto),
        (status = 400, description = "Bad Request", body = Problem, content_type = "application/problem+json"),
        (status = 404, description = "No active task", body = Problem, content_type = "application/problem+json"),
        (status = 500, description = "Internal Server Error", body = Problem, content_type = "application/problem+json"),
    )
)]
pub async fn stop_interval(
    Extension(svc): Extension<Arc<Service>>,
    uri: Uri,
    payload: Result<Json<StopIntervalReq>, JsonRejection>,
) -> Result<Json<WorkIntervalDto>, ProblemResponse> {
    let Json(req_body) = payload.map_err(|r| map_json_rejection(&r, uri.path()))?;
    info!(
        "Stopping task {} for user {}",
        req_body.task_id, req_body.user_id
    );

    match svc
        .stop_interval(req_body.user_id, req_body.task_id)
        .await
    {
        Ok(interval) => Ok(Json(WorkIntervalDto::from(interval))),
        Err(e) => {
            error!("Failed to stop task: {}", e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

/// Hours per task for a user inside a date window, largest first
#[utoipa::path(
    get,
    path = "/worklogs",
    tag = "worklogs",
    params(HoursQuery),
    responses(
        (status = 200, description = "Hours per task", body = [TaskHoursDto]),
        (status = 400, description = "Bad Request", body = Problem, content_type = "application/problem+json"),
        (status = 500, description = "Internal Server Error", body = Problem, content_type = "application/problem+json"),
    )
)]
pub async fn task_hours(
    Extension(svc): Extension<Arc<Service>>,
    uri: Uri,
    query: Result<Query<HoursQuery>, QueryRejection>,
) -> Result<Json<Vec<TaskHoursDto>>, ProblemResponse> {
    let Query(query) = query.map_err(|r| map_query_rejection(&r, uri.path()))?;
    info!("Summarizing hours with query: {:?}", query);

    let window = query
        .window()
        .map_err(|e| map_domain_error(&e, uri.path()))?;

    match svc.task_hours(query.user_id, window).await {
        Ok(summary) => Ok(Json(summary.into_iter().map(TaskHoursDto::from).collect())),
        Err(e) => {
            error!("Failed to summarize hours: {}", e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

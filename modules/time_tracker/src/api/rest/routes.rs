use std::sync::Arc;

use axum::routing::{get, post, put};
use axum::{Extension, Router};

use crate::api::rest::handlers;
use crate::domain::service::Service;

pub fn register_routes(router: Router, service: Arc<Service>) -> Router {
    let module_routes = Router::new()
        .route(
            "/users",
            get(handlers::list_users).post(handlers::create_user),
        )
        .route(
            "/users/{id}",
            put(handlers::update_user).delete(handlers::delete_user),
        )
        .route("/tasks/start", post(handlers::start_interval))
        .route("/tasks/stop", post(handlers::stop_interval))
        .route("/worklogs", get(handlers::task_hours))
        .layer(Extension(service));

    router.merge(module_routes)
}

//! Route definitions for the reslib HTTP API.
//!
//! All routes are organized by domain and mounted under `/v1`.

use axum::{
    Router, middleware as axum_middleware,
    routing::{delete, get, post, put},
};

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the router with all routes and request logging.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(health_routes())
        .merge(template_routes())
        .merge(project_routes())
        .merge(resource_routes())
        .merge(session_routes())
        .merge(collection_routes());

    Router::new()
        .nest("/v1", api_routes)
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .with_state(state)
}

fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}

fn template_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/template",
            post(handlers::template::create_template).get(handlers::template::list_templates),
        )
        .route(
            "/template/{id}",
            put(handlers::template::update_template).delete(handlers::template::delete_template),
        )
}

fn project_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/project",
            post(handlers::project::create_project).get(handlers::project::list_projects),
        )
        .route(
            "/project/{id}",
            put(handlers::project::update_project).delete(handlers::project::delete_project),
        )
        .route("/project/{id}/newkey", put(handlers::project::rotate_key))
}

/// `GET /resource/{id}` takes a project id; `PUT` and `DELETE` take a
/// resource id.
fn resource_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/resource",
            post(handlers::resource::create_resource).get(handlers::resource::list_resources),
        )
        .route(
            "/resource/{id}",
            get(handlers::resource::list_project_resources)
                .put(handlers::resource::update_resource)
                .delete(handlers::resource::delete_resource),
        )
}

fn session_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/session",
            post(handlers::session::create_session).get(handlers::session::list_sessions),
        )
        .route(
            "/session/authorized",
            put(handlers::session::renew_session).delete(handlers::session::close_session),
        )
        .route(
            "/session/{id}",
            delete(handlers::session::close_session_by_id),
        )
        .route(
            "/session/authorized/checkout/{id}",
            put(handlers::session::check_out),
        )
        .route(
            "/session/authorized/checkin/{id}",
            put(handlers::session::check_in),
        )
        .route(
            "/session/authorized/checkout/{id}/{key}",
            put(handlers::session::consume),
        )
        .route(
            "/session/authorized/checkin/{id}/{key}",
            put(handlers::session::release),
        )
}

fn collection_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/collections/{name}",
            get(handlers::collection::list_collection),
        )
        .route(
            "/collections/{name}/{id}",
            get(handlers::collection::get_document),
        )
}

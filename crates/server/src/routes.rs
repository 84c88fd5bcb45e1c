pub mod expenses;
pub mod users;

use axum::{routing::{get, post}, Json, Router};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::types::Health;

use crate::{openapi::ApiDoc, state::AppState};

#[utoipa::path(
    get, path = "/health", tag = "health",
    responses((status = 200, description = "Service is up", body = crate::openapi::HealthResponse))
)]
pub async fn health() -> Json<Health> {
    Json(Health::ok())
}

/// Build the full application router: health, expenses, users and the API docs.
pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    let expense_routes = Router::new()
        .route("/haushaltsausgaben", get(expenses::list).post(expenses::create))
        .route("/haushaltsausgaben/", get(expenses::list).post(expenses::create))
        .route(
            "/haushaltsausgaben/:id",
            get(expenses::get_one).put(expenses::update).delete(expenses::delete),
        )
        .route("/haushaltsausgaben/:id/:month", get(expenses::by_user_and_month));

    let user_routes = Router::new()
        .route("/users", get(users::list).post(users::create))
        .route("/users/", get(users::list).post(users::create))
        .route("/users/login", post(users::login))
        .route("/users/authenticate", post(users::authenticate))
        .route("/users/:id", get(users::get_one).put(users::replace).delete(users::delete));

    Router::new()
        .route("/health", get(health))
        .merge(expense_routes)
        .merge(user_routes)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}

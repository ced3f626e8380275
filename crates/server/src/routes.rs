pub mod auth;
pub mod users;
pub mod courses;
pub mod attendance;
pub mod facilities;
pub mod facility_bookings;
pub mod resources;
pub mod bookings;
pub mod events;
pub mod notifications;
pub mod feedback;
pub mod lost_found;
pub mod visitor_passes;
pub mod cafeteria;

use axum::{
    http::{header, StatusCode},
    middleware,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::Deserialize;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;

use common::{metrics, types::Health};
use service::pagination::Pagination;

use self::auth::ServerState;

/// `?page=&per_page=` with service defaults for absent values.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
pub struct PageQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl From<PageQuery> for Pagination {
    fn from(q: PageQuery) -> Self {
        Pagination::from_query(q.page, q.per_page)
    }
}

/// `?from=&to=` as RFC 3339 timestamps.
#[derive(Debug, Deserialize)]
pub struct TimeRange {
    pub from: DateTimeWithTimeZone,
    pub to: DateTimeWithTimeZone,
}

#[derive(Debug, Deserialize)]
pub struct StatusBody {
    pub status: String,
}

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

pub async fn metrics_handler() -> impl IntoResponse {
    let (code, body) = metrics::encode_metrics();
    let status = StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, [(header::CONTENT_TYPE, "text/plain; version=0.0.4")], body)
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(crate::openapi::ApiDoc::openapi())
}

fn api_router() -> Router<ServerState> {
    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/me", get(auth::me));

    Router::new()
        .nest("/auth", auth_routes)
        .nest("/users", users::router())
        .nest("/courses", courses::router())
        .nest("/attendance", attendance::router())
        .nest("/facilities", facilities::router())
        .nest("/facility-bookings", facility_bookings::router())
        .nest("/resources", resources::router())
        .nest("/bookings", bookings::router())
        .nest("/events", events::router())
        .nest("/notifications", notifications::router())
        .nest("/feedback", feedback::router())
        .nest("/lost-found", lost_found::router())
        .nest("/visitor-passes", visitor_passes::router())
        .nest("/cafeteria", cafeteria::router())
}

/// Build the full application router: public probes, docs and the token-protected API.
pub fn build_router(cors: CorsLayer, state: ServerState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics_handler))
        .route("/api-docs/openapi.json", get(openapi_json))
        .nest("/api", api_router())
        .layer(middleware::from_fn_with_state(state.clone(), auth::require_bearer_token_state))
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

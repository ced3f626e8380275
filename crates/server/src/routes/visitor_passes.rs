use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use models::visitor_pass::{self, NewVisitorPass};
use serde::Deserialize;
use service::{auth::domain::Claims, visitor_pass_service::{self, VisitorPassUpdate}};
use uuid::Uuid;

use crate::errors::JsonApiError;
use crate::guard::{self, ADMIN, ADMIN_STAFF};
use super::{auth::ServerState, PageQuery, TimeRange};

pub fn router() -> Router<ServerState> {
    let any = Router::new()
        .route("/", post(create))
        .route("/my", get(mine))
        .route("/host/:host_id", get(by_host))
        .route("/:id", get(get_one).put(update).delete(remove));
    let gate = Router::new()
        .route("/", get(list))
        .route("/qr/:qr_code", get(by_qr_code))
        .route("/status/:status", get(by_status))
        .route("/range", get(by_range))
        .route("/:id/approve", post(approve))
        .route("/:id/reject", post(reject))
        .route("/:id/check-in", post(check_in))
        .route("/:id/check-out", post(check_out));
    any.merge(guard::restrict(gate, ADMIN_STAFF))
}

#[derive(Debug, Deserialize)]
struct RejectBody {
    reason: String,
}

/// Passes are requested by their host; admins may name another host.
async fn create(
    State(state): State<ServerState>,
    Extension(claims): Extension<Claims>,
    Json(mut input): Json<NewVisitorPass>,
) -> Result<(StatusCode, Json<visitor_pass::Model>), JsonApiError> {
    if !guard::has_role(&claims, ADMIN) {
        input.host_id = None;
    }
    Ok((StatusCode::CREATED, Json(visitor_pass_service::create_pass(&state.db, claims.uid, input).await?)))
}

async fn mine(State(state): State<ServerState>, Extension(claims): Extension<Claims>) -> Result<Json<Vec<visitor_pass::Model>>, JsonApiError> {
    Ok(Json(visitor_pass_service::by_host(&state.db, claims.uid).await?))
}

async fn by_host(State(state): State<ServerState>, Extension(claims): Extension<Claims>, Path(host_id): Path<Uuid>) -> Result<Json<Vec<visitor_pass::Model>>, JsonApiError> {
    guard::ensure_self_or(&claims, host_id, ADMIN_STAFF)?;
    Ok(Json(visitor_pass_service::by_host(&state.db, host_id).await?))
}

async fn hosted(state: &ServerState, claims: &Claims, id: Uuid, roles: &[models::user::Role]) -> Result<visitor_pass::Model, JsonApiError> {
    let pass = visitor_pass_service::get_pass(&state.db, id).await?;
    guard::ensure_self_or(claims, pass.host_id, roles)?;
    Ok(pass)
}

async fn get_one(State(state): State<ServerState>, Extension(claims): Extension<Claims>, Path(id): Path<Uuid>) -> Result<Json<visitor_pass::Model>, JsonApiError> {
    Ok(Json(hosted(&state, &claims, id, ADMIN_STAFF).await?))
}

async fn update(
    State(state): State<ServerState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    Json(input): Json<VisitorPassUpdate>,
) -> Result<Json<visitor_pass::Model>, JsonApiError> {
    hosted(&state, &claims, id, ADMIN).await?;
    Ok(Json(visitor_pass_service::update_pass(&state.db, id, input).await?))
}

async fn remove(State(state): State<ServerState>, Extension(claims): Extension<Claims>, Path(id): Path<Uuid>) -> Result<StatusCode, JsonApiError> {
    hosted(&state, &claims, id, ADMIN).await?;
    visitor_pass_service::delete_pass(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn list(State(state): State<ServerState>, Query(q): Query<PageQuery>) -> Result<Json<Vec<visitor_pass::Model>>, JsonApiError> {
    Ok(Json(visitor_pass_service::list_passes(&state.db, q.into()).await?))
}

async fn by_qr_code(State(state): State<ServerState>, Path(qr_code): Path<String>) -> Result<Json<visitor_pass::Model>, JsonApiError> {
    Ok(Json(visitor_pass_service::get_by_qr_code(&state.db, &qr_code).await?))
}

async fn by_status(State(state): State<ServerState>, Path(status): Path<String>) -> Result<Json<Vec<visitor_pass::Model>>, JsonApiError> {
    Ok(Json(visitor_pass_service::by_status(&state.db, &status).await?))
}

async fn by_range(State(state): State<ServerState>, Query(r): Query<TimeRange>) -> Result<Json<Vec<visitor_pass::Model>>, JsonApiError> {
    Ok(Json(visitor_pass_service::by_date_range(&state.db, r.from, r.to).await?))
}

async fn approve(State(state): State<ServerState>, Extension(claims): Extension<Claims>, Path(id): Path<Uuid>) -> Result<Json<visitor_pass::Model>, JsonApiError> {
    Ok(Json(visitor_pass_service::approve(&state.db, id, claims.uid).await?))
}

async fn reject(
    State(state): State<ServerState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    Json(body): Json<RejectBody>,
) -> Result<Json<visitor_pass::Model>, JsonApiError> {
    Ok(Json(visitor_pass_service::reject(&state.db, id, claims.uid, &body.reason).await?))
}

async fn check_in(State(state): State<ServerState>, Path(id): Path<Uuid>) -> Result<Json<visitor_pass::Model>, JsonApiError> {
    Ok(Json(visitor_pass_service::check_in(&state.db, id).await?))
}

async fn check_out(State(state): State<ServerState>, Path(id): Path<Uuid>) -> Result<Json<visitor_pass::Model>, JsonApiError> {
    Ok(Json(visitor_pass_service::check_out(&state.db, id).await?))
}

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use models::lost_found_item::{self, NewLostFoundItem};
use serde::Deserialize;
use service::{auth::domain::Claims, lost_found_service::{self, LostFoundUpdate}};
use uuid::Uuid;

use crate::errors::JsonApiError;
use crate::guard::{self, ADMIN};
use super::{auth::ServerState, PageQuery};

/// Open to every authenticated user; edits are limited to the reporter.
pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/", get(list).post(report))
        .route("/status/:status", get(by_status))
        .route("/category/:category", get(by_category))
        .route("/user/:user_id", get(by_user))
        .route("/:id", get(get_one).put(update).delete(remove))
        .route("/:id/claim", post(claim))
        .route("/:id/return", post(mark_returned))
}

#[derive(Debug, Default, Deserialize)]
struct ClaimBody {
    #[serde(default)]
    verification_details: Option<String>,
}

async fn list(State(state): State<ServerState>, Query(q): Query<PageQuery>) -> Result<Json<Vec<lost_found_item::Model>>, JsonApiError> {
    Ok(Json(lost_found_service::list_items(&state.db, q.into()).await?))
}

async fn report(
    State(state): State<ServerState>,
    Extension(claims): Extension<Claims>,
    Json(input): Json<NewLostFoundItem>,
) -> Result<(StatusCode, Json<lost_found_item::Model>), JsonApiError> {
    Ok((StatusCode::CREATED, Json(lost_found_service::report(&state.db, claims.uid, input).await?)))
}

async fn get_one(State(state): State<ServerState>, Path(id): Path<Uuid>) -> Result<Json<lost_found_item::Model>, JsonApiError> {
    Ok(Json(lost_found_service::get_item(&state.db, id).await?))
}

async fn reported(state: &ServerState, claims: &Claims, id: Uuid) -> Result<(), JsonApiError> {
    let item = lost_found_service::get_item(&state.db, id).await?;
    match item.found_by {
        Some(reporter) => guard::ensure_self_or(claims, reporter, ADMIN),
        None if guard::has_role(claims, ADMIN) => Ok(()),
        None => Err(JsonApiError::forbidden("only administrators can modify this item")),
    }
}

async fn update(
    State(state): State<ServerState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    Json(input): Json<LostFoundUpdate>,
) -> Result<Json<lost_found_item::Model>, JsonApiError> {
    reported(&state, &claims, id).await?;
    Ok(Json(lost_found_service::update_item(&state.db, id, input).await?))
}

async fn remove(State(state): State<ServerState>, Extension(claims): Extension<Claims>, Path(id): Path<Uuid>) -> Result<StatusCode, JsonApiError> {
    reported(&state, &claims, id).await?;
    lost_found_service::delete_item(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn claim(
    State(state): State<ServerState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    body: Option<Json<ClaimBody>>,
) -> Result<Json<lost_found_item::Model>, JsonApiError> {
    let body = body.map(|Json(b)| b).unwrap_or_default();
    Ok(Json(lost_found_service::claim(&state.db, id, claims.uid, body.verification_details).await?))
}

async fn mark_returned(State(state): State<ServerState>, Extension(claims): Extension<Claims>, Path(id): Path<Uuid>) -> Result<Json<lost_found_item::Model>, JsonApiError> {
    reported(&state, &claims, id).await?;
    Ok(Json(lost_found_service::mark_returned(&state.db, id).await?))
}

async fn by_status(State(state): State<ServerState>, Path(status): Path<String>) -> Result<Json<Vec<lost_found_item::Model>>, JsonApiError> {
    Ok(Json(lost_found_service::by_status(&state.db, &status).await?))
}

async fn by_category(State(state): State<ServerState>, Path(category): Path<String>) -> Result<Json<Vec<lost_found_item::Model>>, JsonApiError> {
    Ok(Json(lost_found_service::by_category(&state.db, &category).await?))
}

async fn by_user(State(state): State<ServerState>, Path(user_id): Path<Uuid>) -> Result<Json<Vec<lost_found_item::Model>>, JsonApiError> {
    Ok(Json(lost_found_service::by_user(&state.db, user_id).await?))
}

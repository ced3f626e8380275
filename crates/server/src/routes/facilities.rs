use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use models::facility::{self, NewFacility};
use service::facility_service;
use uuid::Uuid;

use crate::errors::JsonApiError;
use crate::guard::{self, ADMIN};
use super::auth::ServerState;

pub fn router() -> Router<ServerState> {
    let read = Router::new()
        .route("/", get(list))
        .route("/available", get(available))
        .route("/:id", get(get_one));
    let admin = Router::new()
        .route("/", axum::routing::post(create))
        .route("/:id", axum::routing::put(update).delete(remove));
    read.merge(guard::restrict(admin, ADMIN))
}

async fn list(State(state): State<ServerState>) -> Result<Json<Vec<facility::Model>>, JsonApiError> {
    Ok(Json(facility_service::list_facilities(&state.db).await?))
}

async fn available(State(state): State<ServerState>) -> Result<Json<Vec<facility::Model>>, JsonApiError> {
    Ok(Json(facility_service::list_available(&state.db).await?))
}

async fn get_one(State(state): State<ServerState>, Path(id): Path<Uuid>) -> Result<Json<facility::Model>, JsonApiError> {
    Ok(Json(facility_service::get_facility(&state.db, id).await?))
}

async fn create(State(state): State<ServerState>, Json(input): Json<NewFacility>) -> Result<(StatusCode, Json<facility::Model>), JsonApiError> {
    Ok((StatusCode::CREATED, Json(facility_service::create_facility(&state.db, input).await?)))
}

async fn update(State(state): State<ServerState>, Path(id): Path<Uuid>, Json(input): Json<NewFacility>) -> Result<Json<facility::Model>, JsonApiError> {
    Ok(Json(facility_service::update_facility(&state.db, id, input).await?))
}

async fn remove(State(state): State<ServerState>, Path(id): Path<Uuid>) -> Result<StatusCode, JsonApiError> {
    facility_service::delete_facility(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

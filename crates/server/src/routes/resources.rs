use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch, post},
    Json, Router,
};
use models::resource::{self, NewResource};
use serde::Deserialize;
use service::resource_service;
use uuid::Uuid;

use crate::errors::JsonApiError;
use crate::guard::{self, ADMIN};
use super::auth::ServerState;

pub fn router() -> Router<ServerState> {
    let read = Router::new()
        .route("/", get(list))
        .route("/available", get(available))
        .route("/type/:resource_type", get(by_type))
        .route("/:id", get(get_one));
    let admin = Router::new()
        .route("/", post(create))
        .route("/:id", axum::routing::put(update).delete(remove))
        .route("/:id/availability", patch(set_availability));
    read.merge(guard::restrict(admin, ADMIN))
}

#[derive(Debug, Deserialize)]
struct AvailabilityBody {
    available: bool,
}

async fn list(State(state): State<ServerState>) -> Result<Json<Vec<resource::Model>>, JsonApiError> {
    Ok(Json(resource_service::list_resources(&state.db).await?))
}

async fn available(State(state): State<ServerState>) -> Result<Json<Vec<resource::Model>>, JsonApiError> {
    Ok(Json(resource_service::list_available(&state.db).await?))
}

async fn by_type(State(state): State<ServerState>, Path(resource_type): Path<String>) -> Result<Json<Vec<resource::Model>>, JsonApiError> {
    Ok(Json(resource_service::by_type(&state.db, &resource_type).await?))
}

async fn get_one(State(state): State<ServerState>, Path(id): Path<Uuid>) -> Result<Json<resource::Model>, JsonApiError> {
    Ok(Json(resource_service::get_resource(&state.db, id).await?))
}

async fn create(State(state): State<ServerState>, Json(input): Json<NewResource>) -> Result<(StatusCode, Json<resource::Model>), JsonApiError> {
    Ok((StatusCode::CREATED, Json(resource_service::create_resource(&state.db, input).await?)))
}

async fn update(State(state): State<ServerState>, Path(id): Path<Uuid>, Json(input): Json<NewResource>) -> Result<Json<resource::Model>, JsonApiError> {
    Ok(Json(resource_service::update_resource(&state.db, id, input).await?))
}

async fn set_availability(State(state): State<ServerState>, Path(id): Path<Uuid>, Json(body): Json<AvailabilityBody>) -> Result<Json<resource::Model>, JsonApiError> {
    Ok(Json(resource_service::update_availability(&state.db, id, body.available).await?))
}

async fn remove(State(state): State<ServerState>, Path(id): Path<Uuid>) -> Result<StatusCode, JsonApiError> {
    resource_service::delete_resource(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

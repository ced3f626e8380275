use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch},
    Extension, Json, Router,
};
use models::booking::{self, NewBooking};
use service::{auth::domain::Claims, booking_service};
use uuid::Uuid;

use crate::errors::JsonApiError;
use crate::guard::{self, ADMIN};
use super::{auth::ServerState, StatusBody, TimeRange};

pub fn router() -> Router<ServerState> {
    let any = Router::new()
        .route("/", axum::routing::post(create))
        .route("/my", get(mine))
        .route("/range", get(by_range))
        .route("/user/:user_id", get(by_user))
        .route("/resource/:resource_id", get(by_resource))
        .route("/:id", get(get_one).put(update).delete(remove));
    let admin = Router::new().route("/:id/status", patch(set_status));
    any.merge(guard::restrict(admin, ADMIN))
}

#[utoipa::path(post, path = "/api/bookings", tag = "bookings", request_body = crate::openapi::ResourceBookingRequest, responses((status = 201, description = "Requested, status PENDING"), (status = 409, description = "Overlaps an active booking")))]
pub async fn create(
    State(state): State<ServerState>,
    Extension(claims): Extension<Claims>,
    Json(input): Json<NewBooking>,
) -> Result<(StatusCode, Json<booking::Model>), JsonApiError> {
    Ok((StatusCode::CREATED, Json(booking_service::create_booking(&state.db, claims.uid, input).await?)))
}

async fn mine(State(state): State<ServerState>, Extension(claims): Extension<Claims>) -> Result<Json<Vec<booking::Model>>, JsonApiError> {
    Ok(Json(booking_service::by_user(&state.db, claims.uid).await?))
}

async fn by_user(State(state): State<ServerState>, Extension(claims): Extension<Claims>, Path(user_id): Path<Uuid>) -> Result<Json<Vec<booking::Model>>, JsonApiError> {
    guard::ensure_self_or(&claims, user_id, ADMIN)?;
    Ok(Json(booking_service::by_user(&state.db, user_id).await?))
}

async fn by_resource(State(state): State<ServerState>, Path(resource_id): Path<Uuid>) -> Result<Json<Vec<booking::Model>>, JsonApiError> {
    Ok(Json(booking_service::by_resource(&state.db, resource_id).await?))
}

async fn by_range(State(state): State<ServerState>, Query(r): Query<TimeRange>) -> Result<Json<Vec<booking::Model>>, JsonApiError> {
    Ok(Json(booking_service::by_date_range(&state.db, r.from, r.to).await?))
}

async fn get_one(State(state): State<ServerState>, Extension(claims): Extension<Claims>, Path(id): Path<Uuid>) -> Result<Json<booking::Model>, JsonApiError> {
    let b = booking_service::get_booking(&state.db, id).await?;
    guard::ensure_self_or(&claims, b.user_id, ADMIN)?;
    Ok(Json(b))
}

async fn update(
    State(state): State<ServerState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    Json(input): Json<NewBooking>,
) -> Result<Json<booking::Model>, JsonApiError> {
    let b = booking_service::get_booking(&state.db, id).await?;
    guard::ensure_self_or(&claims, b.user_id, ADMIN)?;
    Ok(Json(booking_service::update_booking(&state.db, id, input).await?))
}

async fn set_status(State(state): State<ServerState>, Path(id): Path<Uuid>, Json(body): Json<StatusBody>) -> Result<Json<booking::Model>, JsonApiError> {
    Ok(Json(booking_service::update_status(&state.db, id, &body.status).await?))
}

async fn remove(State(state): State<ServerState>, Extension(claims): Extension<Claims>, Path(id): Path<Uuid>) -> Result<StatusCode, JsonApiError> {
    let b = booking_service::get_booking(&state.db, id).await?;
    guard::ensure_self_or(&claims, b.user_id, ADMIN)?;
    booking_service::delete_booking(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

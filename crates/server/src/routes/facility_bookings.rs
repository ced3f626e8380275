use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{NaiveDate, NaiveTime};
use models::facility_booking::{self, BookingSlot};
use serde::{Deserialize, Serialize};
use service::auth::domain::Claims;
use uuid::Uuid;

use crate::errors::JsonApiError;
use crate::guard::{self, ADMIN, ADMIN_FACULTY};
use super::auth::ServerState;

pub fn router() -> Router<ServerState> {
    let read = Router::new()
        .route("/", get(list))
        .route("/availability", get(availability))
        .route("/:id", get(get_one))
        .route("/teacher/:teacher_id", get(by_teacher))
        .route("/facility/:facility_id", get(by_facility))
        .route("/facility/:facility_id/date/:date", get(by_facility_and_date));
    let write = Router::new()
        .route("/", post(create))
        .route("/:id", axum::routing::put(update).delete(remove))
        .route("/:id/cancel", post(cancel));
    read.merge(guard::restrict(write, ADMIN_FACULTY))
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct SlotQuery {
    pub facility_id: Uuid,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    #[serde(default)]
    pub exclude_booking_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct Availability {
    pub available: bool,
}

#[utoipa::path(get, path = "/api/facility-bookings/availability", tag = "facility-bookings", params(SlotQuery), responses((status = 200, description = "Whether the slot is free")))]
pub async fn availability(State(state): State<ServerState>, Query(q): Query<SlotQuery>) -> Result<Json<Availability>, JsonApiError> {
    if q.start_time >= q.end_time {
        return Err(JsonApiError::bad_request("start_time must be before end_time"));
    }
    let available = state
        .facility_bookings
        .is_time_slot_available(q.facility_id, q.date, q.start_time, q.end_time, q.exclude_booking_id)
        .await?;
    Ok(Json(Availability { available }))
}

#[utoipa::path(post, path = "/api/facility-bookings", tag = "facility-bookings", request_body = crate::openapi::BookingSlotRequest, responses((status = 201, description = "Booked"), (status = 400, description = "Invalid slot"), (status = 409, description = "Slot taken")))]
pub async fn create(
    State(state): State<ServerState>,
    Extension(claims): Extension<Claims>,
    Json(slot): Json<BookingSlot>,
) -> Result<(StatusCode, Json<facility_booking::Model>), JsonApiError> {
    Ok((StatusCode::CREATED, Json(state.facility_bookings.create(claims.uid, slot).await?)))
}

/// Only the booking teacher or an admin may change a booking.
async fn owned(state: &ServerState, claims: &Claims, id: Uuid) -> Result<(), JsonApiError> {
    let booking = state.facility_bookings.get(id).await?;
    guard::ensure_self_or(claims, booking.teacher_id, ADMIN)
}

async fn update(
    State(state): State<ServerState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    Json(slot): Json<BookingSlot>,
) -> Result<Json<facility_booking::Model>, JsonApiError> {
    owned(&state, &claims, id).await?;
    Ok(Json(state.facility_bookings.update(id, slot).await?))
}

async fn cancel(State(state): State<ServerState>, Extension(claims): Extension<Claims>, Path(id): Path<Uuid>) -> Result<Json<facility_booking::Model>, JsonApiError> {
    owned(&state, &claims, id).await?;
    Ok(Json(state.facility_bookings.cancel(id).await?))
}

async fn remove(State(state): State<ServerState>, Extension(claims): Extension<Claims>, Path(id): Path<Uuid>) -> Result<StatusCode, JsonApiError> {
    owned(&state, &claims, id).await?;
    state.facility_bookings.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn list(State(state): State<ServerState>) -> Result<Json<Vec<facility_booking::Model>>, JsonApiError> {
    Ok(Json(state.facility_bookings.list().await?))
}

async fn get_one(State(state): State<ServerState>, Path(id): Path<Uuid>) -> Result<Json<facility_booking::Model>, JsonApiError> {
    Ok(Json(state.facility_bookings.get(id).await?))
}

async fn by_teacher(State(state): State<ServerState>, Path(teacher_id): Path<Uuid>) -> Result<Json<Vec<facility_booking::Model>>, JsonApiError> {
    Ok(Json(state.facility_bookings.by_teacher(teacher_id).await?))
}

async fn by_facility(State(state): State<ServerState>, Path(facility_id): Path<Uuid>) -> Result<Json<Vec<facility_booking::Model>>, JsonApiError> {
    Ok(Json(state.facility_bookings.by_facility(facility_id).await?))
}

async fn by_facility_and_date(
    State(state): State<ServerState>,
    Path((facility_id, date)): Path<(Uuid, NaiveDate)>,
) -> Result<Json<Vec<facility_booking::Model>>, JsonApiError> {
    Ok(Json(state.facility_bookings.by_facility_and_date(facility_id, date).await?))
}

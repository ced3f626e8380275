use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::NaiveDate;
use models::attendance;
use serde::{Deserialize, Serialize};
use service::attendance::{AttendanceUpdate, BulkAttendance, NewAttendance};
use service::auth::domain::Claims;
use uuid::Uuid;

use crate::errors::JsonApiError;
use crate::guard::{self, ADMIN_FACULTY};
use super::auth::ServerState;

pub fn router() -> Router<ServerState> {
    let read = Router::new()
        .route("/:id", get(get_one))
        .route("/student/:student_id", get(by_student))
        .route("/student/:student_id/percentage", get(overall_percentage))
        .route("/student/:student_id/course/:course_id", get(by_student_and_course))
        .route("/student/:student_id/course/:course_id/percentage", get(percentage))
        .route("/course/:course_id", get(by_course))
        .route("/course/:course_id/range", get(by_course_and_range))
        .route("/range", get(by_range))
        .route("/recorder/:recorder_id", get(by_recorder));
    let write = Router::new()
        .route("/", post(create))
        .route("/bulk", post(bulk_create))
        .route("/:id", axum::routing::put(update).delete(remove));
    read.merge(guard::restrict(write, ADMIN_FACULTY))
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct DayRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

#[derive(Debug, Serialize)]
pub struct Percentage {
    pub student_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course_id: Option<Uuid>,
    pub percentage: f64,
}

async fn create(
    State(state): State<ServerState>,
    Extension(claims): Extension<Claims>,
    Json(input): Json<NewAttendance>,
) -> Result<(StatusCode, Json<attendance::Model>), JsonApiError> {
    Ok((StatusCode::CREATED, Json(state.attendance.create(input, Some(claims.uid)).await?)))
}

#[utoipa::path(post, path = "/api/attendance/bulk", tag = "attendance", request_body = crate::openapi::BulkAttendanceRequest, responses((status = 200, description = "Records written"), (status = 400, description = "Student not enrolled"), (status = 403, description = "Admin or faculty only")))]
pub async fn bulk_create(
    State(state): State<ServerState>,
    Extension(claims): Extension<Claims>,
    Json(input): Json<BulkAttendance>,
) -> Result<Json<Vec<attendance::Model>>, JsonApiError> {
    Ok(Json(state.attendance.bulk_create(input, Some(claims.uid)).await?))
}

async fn update(
    State(state): State<ServerState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    Json(input): Json<AttendanceUpdate>,
) -> Result<Json<attendance::Model>, JsonApiError> {
    Ok(Json(state.attendance.update(id, input, Some(claims.uid)).await?))
}

async fn remove(State(state): State<ServerState>, Path(id): Path<Uuid>) -> Result<StatusCode, JsonApiError> {
    state.attendance.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn get_one(State(state): State<ServerState>, Extension(claims): Extension<Claims>, Path(id): Path<Uuid>) -> Result<Json<attendance::Model>, JsonApiError> {
    let record = state.attendance.get(id).await?;
    guard::ensure_self_or(&claims, record.student_id, ADMIN_FACULTY)?;
    Ok(Json(record))
}

async fn by_student(State(state): State<ServerState>, Extension(claims): Extension<Claims>, Path(student_id): Path<Uuid>) -> Result<Json<Vec<attendance::Model>>, JsonApiError> {
    guard::ensure_self_or(&claims, student_id, ADMIN_FACULTY)?;
    Ok(Json(state.attendance.by_student(student_id).await?))
}

async fn by_student_and_course(
    State(state): State<ServerState>,
    Extension(claims): Extension<Claims>,
    Path((student_id, course_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<Vec<attendance::Model>>, JsonApiError> {
    guard::ensure_self_or(&claims, student_id, ADMIN_FACULTY)?;
    Ok(Json(state.attendance.by_student_and_course(student_id, course_id).await?))
}

async fn percentage(
    State(state): State<ServerState>,
    Extension(claims): Extension<Claims>,
    Path((student_id, course_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<Percentage>, JsonApiError> {
    guard::ensure_self_or(&claims, student_id, ADMIN_FACULTY)?;
    let percentage = state.attendance.percentage(student_id, course_id).await?;
    Ok(Json(Percentage { student_id, course_id: Some(course_id), percentage }))
}

async fn overall_percentage(State(state): State<ServerState>, Extension(claims): Extension<Claims>, Path(student_id): Path<Uuid>) -> Result<Json<Percentage>, JsonApiError> {
    guard::ensure_self_or(&claims, student_id, ADMIN_FACULTY)?;
    let percentage = state.attendance.overall_percentage(student_id).await?;
    Ok(Json(Percentage { student_id, course_id: None, percentage }))
}

async fn by_course(State(state): State<ServerState>, Extension(claims): Extension<Claims>, Path(course_id): Path<Uuid>) -> Result<Json<Vec<attendance::Model>>, JsonApiError> {
    if !guard::has_role(&claims, ADMIN_FACULTY) {
        return Err(JsonApiError::forbidden("course attendance is visible to staff only"));
    }
    Ok(Json(state.attendance.by_course(course_id).await?))
}

async fn by_course_and_range(
    State(state): State<ServerState>,
    Extension(claims): Extension<Claims>,
    Path(course_id): Path<Uuid>,
    Query(r): Query<DayRange>,
) -> Result<Json<Vec<attendance::Model>>, JsonApiError> {
    if !guard::has_role(&claims, ADMIN_FACULTY) {
        return Err(JsonApiError::forbidden("course attendance is visible to staff only"));
    }
    Ok(Json(state.attendance.by_course_and_date_range(course_id, r.from, r.to).await?))
}

async fn by_range(State(state): State<ServerState>, Extension(claims): Extension<Claims>, Query(r): Query<DayRange>) -> Result<Json<Vec<attendance::Model>>, JsonApiError> {
    if !guard::has_role(&claims, ADMIN_FACULTY) {
        return Err(JsonApiError::forbidden("attendance ranges are visible to staff only"));
    }
    Ok(Json(state.attendance.by_date_range(r.from, r.to).await?))
}

async fn by_recorder(State(state): State<ServerState>, Extension(claims): Extension<Claims>, Path(recorder_id): Path<Uuid>) -> Result<Json<Vec<attendance::Model>>, JsonApiError> {
    guard::ensure_self_or(&claims, recorder_id, guard::ADMIN)?;
    Ok(Json(state.attendance.by_recorder(recorder_id).await?))
}

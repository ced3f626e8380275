use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post},
    Extension, Json, Router,
};
use models::{course, course_enrollment, course_resource::{self, NewCourseResource}, course_teacher, user};
use service::{auth::domain::Claims, course_resource_service, course_service};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::JsonApiError;
use crate::guard::{self, ADMIN, ADMIN_FACULTY};
use super::{auth::ServerState, PageQuery};

pub fn router() -> Router<ServerState> {
    let read = Router::new()
        .route("/", get(list))
        .route("/:id", get(get_one))
        .route("/:id/students", get(students))
        .route("/:id/teachers", get(teachers))
        .route("/:id/resources", get(resources))
        .route("/teacher/:teacher_id", get(by_teacher))
        .route("/student/:student_id", get(by_student))
        .route("/resources/:resource_id", get(get_resource));
    let staff = Router::new()
        .route("/", post(create))
        .route("/:id", axum::routing::put(update))
        .route("/:id/students/:student_id", post(enroll).delete(unenroll))
        .route("/:id/resources", post(add_resource))
        .route("/resources/:resource_id", delete(remove_resource));
    let admin = Router::new()
        .route("/:id", delete(remove))
        .route("/:id/teachers/:teacher_id", post(assign_teacher).delete(remove_teacher));
    read.merge(guard::restrict(staff, ADMIN_FACULTY)).merge(guard::restrict(admin, ADMIN))
}

#[utoipa::path(get, path = "/api/courses", tag = "courses", params(PageQuery), responses((status = 200, description = "Courses page")))]
pub async fn list(State(state): State<ServerState>, Query(q): Query<PageQuery>) -> Result<Json<Vec<course::Model>>, JsonApiError> {
    Ok(Json(course_service::list_courses(&state.db, q.into()).await?))
}

async fn get_one(State(state): State<ServerState>, Path(id): Path<Uuid>) -> Result<Json<course::Model>, JsonApiError> {
    Ok(Json(course_service::get_course(&state.db, id).await?))
}

async fn create(State(state): State<ServerState>, Json(input): Json<course::NewCourse>) -> Result<(StatusCode, Json<course::Model>), JsonApiError> {
    Ok((StatusCode::CREATED, Json(course_service::create_course(&state.db, input).await?)))
}

async fn update(State(state): State<ServerState>, Path(id): Path<Uuid>, Json(input): Json<course::NewCourse>) -> Result<Json<course::Model>, JsonApiError> {
    Ok(Json(course_service::update_course(&state.db, id, input).await?))
}

async fn remove(State(state): State<ServerState>, Path(id): Path<Uuid>) -> Result<StatusCode, JsonApiError> {
    course_service::delete_course(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn enroll(State(state): State<ServerState>, Path((id, student_id)): Path<(Uuid, Uuid)>) -> Result<(StatusCode, Json<course_enrollment::Model>), JsonApiError> {
    Ok((StatusCode::CREATED, Json(course_service::enroll_student(&state.db, id, student_id).await?)))
}

async fn unenroll(State(state): State<ServerState>, Path((id, student_id)): Path<(Uuid, Uuid)>) -> Result<StatusCode, JsonApiError> {
    course_service::unenroll_student(&state.db, id, student_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn assign_teacher(State(state): State<ServerState>, Path((id, teacher_id)): Path<(Uuid, Uuid)>) -> Result<(StatusCode, Json<course_teacher::Model>), JsonApiError> {
    Ok((StatusCode::CREATED, Json(course_service::assign_teacher(&state.db, id, teacher_id).await?)))
}

async fn remove_teacher(State(state): State<ServerState>, Path((id, teacher_id)): Path<(Uuid, Uuid)>) -> Result<StatusCode, JsonApiError> {
    course_service::remove_teacher(&state.db, id, teacher_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn students(State(state): State<ServerState>, Path(id): Path<Uuid>) -> Result<Json<Vec<user::Model>>, JsonApiError> {
    Ok(Json(course_service::list_students(&state.db, id).await?))
}

async fn teachers(State(state): State<ServerState>, Path(id): Path<Uuid>) -> Result<Json<Vec<user::Model>>, JsonApiError> {
    Ok(Json(course_service::list_teachers(&state.db, id).await?))
}

async fn by_teacher(State(state): State<ServerState>, Path(teacher_id): Path<Uuid>) -> Result<Json<Vec<course::Model>>, JsonApiError> {
    Ok(Json(course_service::courses_by_teacher(&state.db, teacher_id).await?))
}

async fn by_student(State(state): State<ServerState>, Path(student_id): Path<Uuid>) -> Result<Json<Vec<course::Model>>, JsonApiError> {
    Ok(Json(course_service::courses_by_student(&state.db, student_id).await?))
}

async fn resources(State(state): State<ServerState>, Path(id): Path<Uuid>) -> Result<Json<Vec<course_resource::Model>>, JsonApiError> {
    Ok(Json(course_resource_service::list_by_course(&state.db, id).await?))
}

#[derive(Debug, Deserialize)]
struct ResourceBody {
    title: String,
    #[serde(default)]
    description: Option<String>,
    file_path: String,
    #[serde(default = "default_resource_type")]
    resource_type: String,
}

fn default_resource_type() -> String { "OTHER".into() }

async fn add_resource(
    State(state): State<ServerState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    Json(body): Json<ResourceBody>,
) -> Result<(StatusCode, Json<course_resource::Model>), JsonApiError> {
    let input = NewCourseResource {
        course_id: id,
        title: body.title,
        description: body.description,
        file_path: body.file_path,
        resource_type: body.resource_type,
    };
    let created = course_resource_service::create_resource(&state.db, input, Some(claims.uid)).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn get_resource(State(state): State<ServerState>, Path(resource_id): Path<Uuid>) -> Result<Json<course_resource::Model>, JsonApiError> {
    Ok(Json(course_resource_service::get_resource(&state.db, resource_id).await?))
}

async fn remove_resource(State(state): State<ServerState>, Path(resource_id): Path<Uuid>) -> Result<StatusCode, JsonApiError> {
    course_resource_service::delete_resource(&state.db, resource_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

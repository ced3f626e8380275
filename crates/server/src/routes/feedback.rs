use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch, post},
    Extension, Json, Router,
};
use models::feedback::{self, NewFeedback};
use serde::Deserialize;
use service::{auth::domain::Claims, feedback_service::{self, FeedbackUpdate}};
use uuid::Uuid;

use crate::errors::JsonApiError;
use crate::guard::{self, ADMIN};
use super::{auth::ServerState, PageQuery, StatusBody};

pub fn router() -> Router<ServerState> {
    let any = Router::new()
        .route("/", post(submit))
        .route("/my", get(mine))
        .route("/:id", get(get_one).put(update).delete(remove));
    let admin = Router::new()
        .route("/", get(list))
        .route("/status/:status", get(by_status))
        .route("/category/:category", get(by_category))
        .route("/:id/respond", post(respond))
        .route("/:id/status", patch(set_status));
    any.merge(guard::restrict(admin, ADMIN))
}

#[derive(Debug, Deserialize)]
struct ResponseBody {
    response: String,
}

async fn submit(State(state): State<ServerState>, Extension(claims): Extension<Claims>, Json(input): Json<NewFeedback>) -> Result<(StatusCode, Json<feedback::Model>), JsonApiError> {
    Ok((StatusCode::CREATED, Json(feedback_service::create_feedback(&state.db, claims.uid, input).await?)))
}

async fn mine(State(state): State<ServerState>, Extension(claims): Extension<Claims>) -> Result<Json<Vec<feedback::Model>>, JsonApiError> {
    Ok(Json(feedback_service::by_user(&state.db, claims.uid).await?))
}

async fn owned(state: &ServerState, claims: &Claims, id: Uuid) -> Result<feedback::Model, JsonApiError> {
    let f = feedback_service::get_feedback(&state.db, id).await?;
    guard::ensure_self_or(claims, f.user_id, ADMIN)?;
    Ok(f)
}

async fn get_one(State(state): State<ServerState>, Extension(claims): Extension<Claims>, Path(id): Path<Uuid>) -> Result<Json<feedback::Model>, JsonApiError> {
    Ok(Json(owned(&state, &claims, id).await?))
}

async fn update(
    State(state): State<ServerState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    Json(input): Json<FeedbackUpdate>,
) -> Result<Json<feedback::Model>, JsonApiError> {
    let f = feedback_service::get_feedback(&state.db, id).await?;
    if f.user_id != claims.uid {
        return Err(JsonApiError::forbidden("only the submitter can edit feedback"));
    }
    Ok(Json(feedback_service::update_feedback(&state.db, id, input).await?))
}

async fn remove(State(state): State<ServerState>, Extension(claims): Extension<Claims>, Path(id): Path<Uuid>) -> Result<StatusCode, JsonApiError> {
    owned(&state, &claims, id).await?;
    feedback_service::delete_feedback(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn list(State(state): State<ServerState>, Query(q): Query<PageQuery>) -> Result<Json<Vec<feedback::Model>>, JsonApiError> {
    Ok(Json(feedback_service::list_feedback(&state.db, q.into()).await?))
}

async fn by_status(State(state): State<ServerState>, Path(status): Path<String>) -> Result<Json<Vec<feedback::Model>>, JsonApiError> {
    Ok(Json(feedback_service::by_status(&state.db, &status).await?))
}

async fn by_category(State(state): State<ServerState>, Path(category): Path<String>) -> Result<Json<Vec<feedback::Model>>, JsonApiError> {
    Ok(Json(feedback_service::by_category(&state.db, &category).await?))
}

async fn respond(
    State(state): State<ServerState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    Json(body): Json<ResponseBody>,
) -> Result<Json<feedback::Model>, JsonApiError> {
    Ok(Json(feedback_service::respond(&state.db, id, claims.uid, &body.response).await?))
}

async fn set_status(State(state): State<ServerState>, Path(id): Path<Uuid>, Json(body): Json<StatusBody>) -> Result<Json<feedback::Model>, JsonApiError> {
    Ok(Json(feedback_service::update_status(&state.db, id, &body.status).await?))
}

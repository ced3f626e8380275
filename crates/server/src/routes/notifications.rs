use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch, post},
    Extension, Json, Router,
};
use common::types::Value;
use models::{notification::{self, NewNotification}, user::Role};
use service::{auth::domain::Claims, notification_service};
use uuid::Uuid;

use crate::errors::JsonApiError;
use crate::guard::{self, ADMIN, ADMIN_FACULTY};
use super::auth::ServerState;

pub fn router() -> Router<ServerState> {
    let own = Router::new()
        .route("/my", get(mine))
        .route("/my/unread", get(unread))
        .route("/my/unread-count", get(unread_count))
        .route("/my/type/:notification_type", get(by_type))
        .route("/my/read-all", patch(read_all))
        .route("/:id", get(get_one).delete(remove))
        .route("/:id/read", patch(mark_read));
    let senders = Router::new()
        .route("/user/:recipient_id", post(send))
        .route("/broadcast/:role", post(broadcast));
    own.merge(guard::restrict(senders, ADMIN_FACULTY))
}

async fn owned(state: &ServerState, claims: &Claims, id: Uuid) -> Result<notification::Model, JsonApiError> {
    let n = notification_service::get_notification(&state.db, id).await?;
    guard::ensure_self_or(claims, n.recipient_id, ADMIN)?;
    Ok(n)
}

async fn mine(State(state): State<ServerState>, Extension(claims): Extension<Claims>) -> Result<Json<Vec<notification::Model>>, JsonApiError> {
    Ok(Json(notification_service::by_user(&state.db, claims.uid).await?))
}

async fn unread(State(state): State<ServerState>, Extension(claims): Extension<Claims>) -> Result<Json<Vec<notification::Model>>, JsonApiError> {
    Ok(Json(notification_service::unread(&state.db, claims.uid).await?))
}

async fn unread_count(State(state): State<ServerState>, Extension(claims): Extension<Claims>) -> Result<Json<Value<u64>>, JsonApiError> {
    Ok(Json(Value { value: notification_service::unread_count(&state.db, claims.uid).await? }))
}

async fn by_type(
    State(state): State<ServerState>,
    Extension(claims): Extension<Claims>,
    Path(notification_type): Path<String>,
) -> Result<Json<Vec<notification::Model>>, JsonApiError> {
    Ok(Json(notification_service::by_type(&state.db, claims.uid, &notification_type).await?))
}

async fn read_all(State(state): State<ServerState>, Extension(claims): Extension<Claims>) -> Result<Json<Value<u64>>, JsonApiError> {
    Ok(Json(Value { value: notification_service::mark_all_as_read(&state.db, claims.uid).await? }))
}

async fn get_one(State(state): State<ServerState>, Extension(claims): Extension<Claims>, Path(id): Path<Uuid>) -> Result<Json<notification::Model>, JsonApiError> {
    Ok(Json(owned(&state, &claims, id).await?))
}

async fn mark_read(State(state): State<ServerState>, Extension(claims): Extension<Claims>, Path(id): Path<Uuid>) -> Result<Json<notification::Model>, JsonApiError> {
    let n = notification_service::get_notification(&state.db, id).await?;
    if n.recipient_id != claims.uid {
        return Err(JsonApiError::forbidden("only the recipient can mark a notification read"));
    }
    Ok(Json(notification_service::mark_as_read(&state.db, id).await?))
}

async fn remove(State(state): State<ServerState>, Extension(claims): Extension<Claims>, Path(id): Path<Uuid>) -> Result<StatusCode, JsonApiError> {
    owned(&state, &claims, id).await?;
    notification_service::delete_notification(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn send(
    State(state): State<ServerState>,
    Path(recipient_id): Path<Uuid>,
    Json(input): Json<NewNotification>,
) -> Result<(StatusCode, Json<notification::Model>), JsonApiError> {
    Ok((StatusCode::CREATED, Json(notification_service::create_notification(&state.db, recipient_id, input).await?)))
}

#[utoipa::path(post, path = "/api/notifications/broadcast/{role}", tag = "notifications", params(("role" = String, Path, description = "ADMIN, FACULTY, STUDENT or STAFF")), responses((status = 200, description = "Number of notifications sent")))]
pub async fn broadcast(State(state): State<ServerState>, Path(role): Path<String>, Json(input): Json<NewNotification>) -> Result<Json<Value<u64>>, JsonApiError> {
    let role: Role = role.parse().map_err(|e: models::errors::ModelError| JsonApiError::bad_request(e.to_string()))?;
    Ok(Json(Value { value: notification_service::broadcast_to_role(&state.db, role, input).await? }))
}

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Extension, Json, Router,
};
use models::user::{self, Role};
use service::{auth::domain::Claims, user_service::{self, NewUser, UserUpdate}};
use uuid::Uuid;

use crate::errors::JsonApiError;
use crate::guard::{self, ADMIN};
use super::{auth::ServerState, PageQuery};

pub fn router() -> Router<ServerState> {
    let admin = Router::new()
        .route("/", get(list).post(create))
        .route("/role/:role", get(by_role))
        .route("/username/:username", get(by_username))
        .route("/:id", axum::routing::delete(remove));
    let own = Router::new().route("/:id", get(get_one).put(update));
    guard::restrict(admin, ADMIN).merge(own)
}

#[utoipa::path(get, path = "/api/users", tag = "users", params(PageQuery), responses((status = 200, description = "Users page"), (status = 403, description = "Admin only")))]
pub async fn list(State(state): State<ServerState>, Query(q): Query<PageQuery>) -> Result<Json<Vec<user::Model>>, JsonApiError> {
    Ok(Json(user_service::list_users(&state.db, q.into()).await?))
}

async fn create(State(state): State<ServerState>, Json(input): Json<NewUser>) -> Result<(StatusCode, Json<user::Model>), JsonApiError> {
    Ok((StatusCode::CREATED, Json(user_service::create_user(&state.db, input).await?)))
}

async fn by_role(State(state): State<ServerState>, Path(role): Path<String>) -> Result<Json<Vec<user::Model>>, JsonApiError> {
    let role: Role = role.parse().map_err(|e: models::errors::ModelError| JsonApiError::bad_request(e.to_string()))?;
    Ok(Json(user_service::list_by_role(&state.db, role).await?))
}

async fn by_username(State(state): State<ServerState>, Path(username): Path<String>) -> Result<Json<user::Model>, JsonApiError> {
    Ok(Json(user_service::get_by_username(&state.db, &username).await?))
}

async fn get_one(State(state): State<ServerState>, Extension(claims): Extension<Claims>, Path(id): Path<Uuid>) -> Result<Json<user::Model>, JsonApiError> {
    guard::ensure_self_or(&claims, id, ADMIN)?;
    Ok(Json(user_service::get_user(&state.db, id).await?))
}

/// Users may edit their own profile; role and enabled flag stay admin-only.
async fn update(
    State(state): State<ServerState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    Json(update): Json<UserUpdate>,
) -> Result<Json<user::Model>, JsonApiError> {
    guard::ensure_self_or(&claims, id, ADMIN)?;
    if !guard::has_role(&claims, ADMIN) && (update.role.is_some() || update.enabled.is_some()) {
        return Err(JsonApiError::forbidden("only administrators can change role or enabled"));
    }
    Ok(Json(user_service::update_user(&state.db, id, update).await?))
}

async fn remove(State(state): State<ServerState>, Path(id): Path<Uuid>) -> Result<StatusCode, JsonApiError> {
    user_service::delete_user(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

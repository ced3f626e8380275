use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use models::{event::{self, NewEvent}, event_participant, user};
use service::{auth::domain::Claims, event_service};
use uuid::Uuid;

use crate::errors::JsonApiError;
use crate::guard::{self, ADMIN, ADMIN_FACULTY};
use super::{auth::ServerState, TimeRange};

pub fn router() -> Router<ServerState> {
    let any = Router::new()
        .route("/", get(list))
        .route("/upcoming", get(upcoming))
        .route("/range", get(by_range))
        .route("/organizer/:organizer_id", get(by_organizer))
        .route("/:id", get(get_one))
        .route("/:id/participants", get(participants))
        .route("/:id/register", post(register).delete(unregister));
    let organizers = Router::new()
        .route("/", post(create))
        .route("/:id", axum::routing::put(update).delete(remove));
    any.merge(guard::restrict(organizers, ADMIN_FACULTY))
}

async fn list(State(state): State<ServerState>) -> Result<Json<Vec<event::Model>>, JsonApiError> {
    Ok(Json(event_service::list_events(&state.db).await?))
}

async fn upcoming(State(state): State<ServerState>) -> Result<Json<Vec<event::Model>>, JsonApiError> {
    Ok(Json(event_service::upcoming(&state.db).await?))
}

async fn by_range(State(state): State<ServerState>, Query(r): Query<TimeRange>) -> Result<Json<Vec<event::Model>>, JsonApiError> {
    Ok(Json(event_service::by_date_range(&state.db, r.from, r.to).await?))
}

async fn by_organizer(State(state): State<ServerState>, Path(organizer_id): Path<Uuid>) -> Result<Json<Vec<event::Model>>, JsonApiError> {
    Ok(Json(event_service::by_organizer(&state.db, organizer_id).await?))
}

async fn get_one(State(state): State<ServerState>, Path(id): Path<Uuid>) -> Result<Json<event::Model>, JsonApiError> {
    Ok(Json(event_service::get_event(&state.db, id).await?))
}

async fn participants(State(state): State<ServerState>, Path(id): Path<Uuid>) -> Result<Json<Vec<user::Model>>, JsonApiError> {
    Ok(Json(event_service::participants(&state.db, id).await?))
}

async fn register(State(state): State<ServerState>, Extension(claims): Extension<Claims>, Path(id): Path<Uuid>) -> Result<(StatusCode, Json<event_participant::Model>), JsonApiError> {
    Ok((StatusCode::CREATED, Json(event_service::register(&state.db, id, claims.uid).await?)))
}

async fn unregister(State(state): State<ServerState>, Extension(claims): Extension<Claims>, Path(id): Path<Uuid>) -> Result<StatusCode, JsonApiError> {
    event_service::unregister(&state.db, id, claims.uid).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn create(State(state): State<ServerState>, Extension(claims): Extension<Claims>, Json(input): Json<NewEvent>) -> Result<(StatusCode, Json<event::Model>), JsonApiError> {
    Ok((StatusCode::CREATED, Json(event_service::create_event(&state.db, claims.uid, input).await?)))
}

/// Faculty may only edit their own events.
async fn organized(state: &ServerState, claims: &Claims, id: Uuid) -> Result<(), JsonApiError> {
    let e = event_service::get_event(&state.db, id).await?;
    guard::ensure_self_or(claims, e.organizer_id, ADMIN)
}

async fn update(
    State(state): State<ServerState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    Json(input): Json<NewEvent>,
) -> Result<Json<event::Model>, JsonApiError> {
    organized(&state, &claims, id).await?;
    Ok(Json(event_service::update_event(&state.db, id, input).await?))
}

async fn remove(State(state): State<ServerState>, Extension(claims): Extension<Claims>, Path(id): Path<Uuid>) -> Result<StatusCode, JsonApiError> {
    organized(&state, &claims, id).await?;
    event_service::delete_event(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch, post},
    Extension, Json, Router,
};
use models::{cafeteria_item::{self, NewCafeteriaItem}, cafeteria_order, cafeteria_order_item};
use serde::Deserialize;
use service::{auth::domain::Claims, cafeteria_service::{self, NewOrder, OrderDetails}};
use uuid::Uuid;

use crate::errors::JsonApiError;
use crate::guard::{self, ADMIN_STAFF};
use super::{auth::ServerState, StatusBody};

pub fn router() -> Router<ServerState> {
    let any = Router::new()
        .route("/items", get(list_items))
        .route("/items/available", get(available_items))
        .route("/items/category/:category", get(items_by_category))
        .route("/items/:id", get(get_item))
        .route("/orders", post(place_order))
        .route("/orders/my", get(my_orders))
        .route("/orders/user/:user_id", get(orders_by_user))
        .route("/orders/:id", get(get_order))
        .route("/orders/:id/items", get(order_lines));
    let kitchen = Router::new()
        .route("/items", post(create_item))
        .route("/items/:id", axum::routing::put(update_item).delete(delete_item))
        .route("/orders/status/:status", get(orders_by_status))
        .route("/orders/:id/status", patch(set_order_status))
        .route("/orders/:id/payment", patch(set_payment_status));
    any.merge(guard::restrict(kitchen, ADMIN_STAFF))
}

#[derive(Debug, Deserialize)]
struct PaymentBody {
    payment_status: String,
}

async fn list_items(State(state): State<ServerState>) -> Result<Json<Vec<cafeteria_item::Model>>, JsonApiError> {
    Ok(Json(cafeteria_service::list_items(&state.db).await?))
}

async fn available_items(State(state): State<ServerState>) -> Result<Json<Vec<cafeteria_item::Model>>, JsonApiError> {
    Ok(Json(cafeteria_service::available_items(&state.db).await?))
}

async fn items_by_category(State(state): State<ServerState>, Path(category): Path<String>) -> Result<Json<Vec<cafeteria_item::Model>>, JsonApiError> {
    Ok(Json(cafeteria_service::items_by_category(&state.db, &category).await?))
}

async fn get_item(State(state): State<ServerState>, Path(id): Path<Uuid>) -> Result<Json<cafeteria_item::Model>, JsonApiError> {
    Ok(Json(cafeteria_service::get_item(&state.db, id).await?))
}

async fn create_item(State(state): State<ServerState>, Json(input): Json<NewCafeteriaItem>) -> Result<(StatusCode, Json<cafeteria_item::Model>), JsonApiError> {
    Ok((StatusCode::CREATED, Json(cafeteria_service::create_item(&state.db, input).await?)))
}

async fn update_item(State(state): State<ServerState>, Path(id): Path<Uuid>, Json(input): Json<NewCafeteriaItem>) -> Result<Json<cafeteria_item::Model>, JsonApiError> {
    Ok(Json(cafeteria_service::update_item(&state.db, id, input).await?))
}

async fn delete_item(State(state): State<ServerState>, Path(id): Path<Uuid>) -> Result<StatusCode, JsonApiError> {
    cafeteria_service::delete_item(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(post, path = "/api/cafeteria/orders", tag = "cafeteria", request_body = crate::openapi::OrderRequest, responses((status = 201, description = "Order placed, stock reserved"), (status = 400, description = "Unavailable item or insufficient stock"), (status = 404, description = "Unknown item")))]
pub async fn place_order(
    State(state): State<ServerState>,
    Extension(claims): Extension<Claims>,
    Json(input): Json<NewOrder>,
) -> Result<(StatusCode, Json<OrderDetails>), JsonApiError> {
    Ok((StatusCode::CREATED, Json(cafeteria_service::create_order(&state.db, claims.uid, input).await?)))
}

async fn my_orders(State(state): State<ServerState>, Extension(claims): Extension<Claims>) -> Result<Json<Vec<cafeteria_order::Model>>, JsonApiError> {
    Ok(Json(cafeteria_service::orders_by_user(&state.db, claims.uid).await?))
}

async fn orders_by_user(State(state): State<ServerState>, Extension(claims): Extension<Claims>, Path(user_id): Path<Uuid>) -> Result<Json<Vec<cafeteria_order::Model>>, JsonApiError> {
    guard::ensure_self_or(&claims, user_id, ADMIN_STAFF)?;
    Ok(Json(cafeteria_service::orders_by_user(&state.db, user_id).await?))
}

async fn get_order(State(state): State<ServerState>, Extension(claims): Extension<Claims>, Path(id): Path<Uuid>) -> Result<Json<OrderDetails>, JsonApiError> {
    let details = cafeteria_service::get_order(&state.db, id).await?;
    guard::ensure_self_or(&claims, details.order.user_id, ADMIN_STAFF)?;
    Ok(Json(details))
}

async fn order_lines(State(state): State<ServerState>, Extension(claims): Extension<Claims>, Path(id): Path<Uuid>) -> Result<Json<Vec<cafeteria_order_item::Model>>, JsonApiError> {
    let details = cafeteria_service::get_order(&state.db, id).await?;
    guard::ensure_self_or(&claims, details.order.user_id, ADMIN_STAFF)?;
    Ok(Json(details.items))
}

async fn orders_by_status(State(state): State<ServerState>, Path(status): Path<String>) -> Result<Json<Vec<cafeteria_order::Model>>, JsonApiError> {
    Ok(Json(cafeteria_service::orders_by_status(&state.db, &status).await?))
}

async fn set_order_status(State(state): State<ServerState>, Path(id): Path<Uuid>, Json(body): Json<StatusBody>) -> Result<Json<cafeteria_order::Model>, JsonApiError> {
    Ok(Json(cafeteria_service::update_order_status(&state.db, id, &body.status).await?))
}

async fn set_payment_status(State(state): State<ServerState>, Path(id): Path<Uuid>, Json(body): Json<PaymentBody>) -> Result<Json<cafeteria_order::Model>, JsonApiError> {
    Ok(Json(cafeteria_service::update_payment_status(&state.db, id, &body.payment_status).await?))
}

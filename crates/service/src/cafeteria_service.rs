//! Cafeteria menu and orders. Placing or cancelling an order moves stock in
//! the same transaction as the order rows.

use std::collections::HashMap;

use uuid::Uuid;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use models::errors;
use models::cafeteria_item::{self, NewCafeteriaItem};
use models::{cafeteria_order, cafeteria_order_item};
use crate::errors::ServiceError;

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct OrderLine {
    pub item_id: Uuid,
    pub quantity: i32,
    #[serde(default)]
    pub special_instructions: Option<String>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct NewOrder {
    pub items: Vec<OrderLine>,
    #[serde(default)]
    pub payment_method: Option<String>,
    #[serde(default)]
    pub delivery_location: Option<String>,
    #[serde(default)]
    pub remarks: Option<String>,
}

/// An order together with its lines.
#[derive(Clone, Debug, Serialize)]
pub struct OrderDetails {
    #[serde(flatten)]
    pub order: cafeteria_order::Model,
    pub items: Vec<cafeteria_order_item::Model>,
}

// ---- menu ----

pub async fn create_item(db: &DatabaseConnection, input: NewCafeteriaItem) -> Result<cafeteria_item::Model, ServiceError> {
    Ok(cafeteria_item::create(db, input).await?)
}

pub async fn update_item(db: &DatabaseConnection, id: Uuid, input: NewCafeteriaItem) -> Result<cafeteria_item::Model, ServiceError> {
    errors::require("name", &input.name)?;
    cafeteria_item::validate_price(input.price_cents)?;
    if input.quantity < 0 {
        return Err(ServiceError::Validation("quantity must be >= 0".into()));
    }
    let category = errors::one_of("category", &input.category, cafeteria_item::CATEGORIES)?;
    let mut am: cafeteria_item::ActiveModel = get_item(db, id).await?.into();
    am.name = Set(input.name.trim().to_string());
    am.description = Set(input.description);
    am.price_cents = Set(input.price_cents);
    am.quantity = Set(input.quantity);
    am.category = Set(category);
    am.image_url = Set(input.image_url);
    am.available = Set(input.available);
    am.preparation_time_minutes = Set(input.preparation_time_minutes);
    am.ingredients = Set(input.ingredients);
    am.dietary_info = Set(input.dietary_info);
    am.updated_at = Set(Utc::now().into());
    Ok(am.update(db).await?)
}

pub async fn get_item(db: &DatabaseConnection, id: Uuid) -> Result<cafeteria_item::Model, ServiceError> {
    cafeteria_item::Entity::find_by_id(id).one(db).await?.ok_or_else(|| ServiceError::not_found("cafeteria item"))
}

pub async fn list_items(db: &DatabaseConnection) -> Result<Vec<cafeteria_item::Model>, ServiceError> {
    Ok(cafeteria_item::Entity::find().order_by_asc(cafeteria_item::Column::Name).all(db).await?)
}

pub async fn items_by_category(db: &DatabaseConnection, category: &str) -> Result<Vec<cafeteria_item::Model>, ServiceError> {
    let category = errors::one_of("category", category, cafeteria_item::CATEGORIES)?;
    Ok(cafeteria_item::Entity::find()
        .filter(cafeteria_item::Column::Category.eq(category))
        .order_by_asc(cafeteria_item::Column::Name)
        .all(db)
        .await?)
}

/// Items flagged available with stock left.
pub async fn available_items(db: &DatabaseConnection) -> Result<Vec<cafeteria_item::Model>, ServiceError> {
    Ok(cafeteria_item::Entity::find()
        .filter(cafeteria_item::Column::Available.eq(true))
        .filter(cafeteria_item::Column::Quantity.gt(0))
        .order_by_asc(cafeteria_item::Column::Name)
        .all(db)
        .await?)
}

/// Items referenced by past orders stay on record.
pub async fn delete_item(db: &DatabaseConnection, id: Uuid) -> Result<(), ServiceError> {
    let referenced = cafeteria_order_item::Entity::find()
        .filter(cafeteria_order_item::Column::ItemId.eq(id))
        .count(db)
        .await?;
    if referenced > 0 {
        return Err(ServiceError::conflict("item is referenced by existing orders; mark it unavailable instead"));
    }
    if cafeteria_item::Entity::delete_by_id(id).exec(db).await?.rows_affected == 0 {
        return Err(ServiceError::not_found("cafeteria item"));
    }
    Ok(())
}

// ---- orders ----

/// Place an order: every line is checked against current stock (repeated
/// items count together), stock is decremented and the order is stored with
/// prices frozen at this moment. Any failure leaves stock untouched.
pub async fn create_order(db: &DatabaseConnection, user_id: Uuid, input: NewOrder) -> Result<OrderDetails, ServiceError> {
    if input.items.is_empty() {
        return Err(ServiceError::Validation("order must contain at least one item".into()));
    }
    let txn = db.begin().await?;

    let mut requested: HashMap<Uuid, i32> = HashMap::new();
    let mut stock: HashMap<Uuid, cafeteria_item::Model> = HashMap::new();
    for line in &input.items {
        if line.quantity < 1 {
            return Err(ServiceError::Validation("line quantity must be >= 1".into()));
        }
        let total = requested.entry(line.item_id).or_insert(0);
        *total = total
            .checked_add(line.quantity)
            .ok_or_else(|| ServiceError::Validation("requested quantity is too large".into()))?;
        if !stock.contains_key(&line.item_id) {
            let item = cafeteria_item::Entity::find_by_id(line.item_id)
                .one(&txn)
                .await?
                .ok_or_else(|| ServiceError::not_found("cafeteria item"))?;
            stock.insert(line.item_id, item);
        }
        if let Some(item) = stock.get(&line.item_id) {
            item.check_orderable(*total)?;
        }
    }

    for (item_id, qty) in &requested {
        if let Some(item) = stock.remove(item_id) {
            let left = item.quantity - qty;
            let mut am: cafeteria_item::ActiveModel = item.into();
            am.quantity = Set(left);
            am.updated_at = Set(Utc::now().into());
            am.update(&txn).await?;
        }
    }

    let order_id = Uuid::new_v4();
    let mut priced = Vec::with_capacity(input.items.len());
    let mut lines = Vec::with_capacity(input.items.len());
    for line in input.items {
        let price = unit_price(&txn, line.item_id).await?;
        priced.push((price, line.quantity));
        lines.push(cafeteria_order_item::ActiveModel {
            id: Set(Uuid::new_v4()),
            order_id: Set(order_id),
            item_id: Set(line.item_id),
            quantity: Set(line.quantity),
            unit_price_cents: Set(price),
            special_instructions: Set(line.special_instructions),
        });
    }

    let total_cents = cafeteria_order_item::total_cents(&priced)
        .ok_or_else(|| ServiceError::Validation("order total is out of range".into()))?;
    let order = cafeteria_order::ActiveModel {
        id: Set(order_id),
        user_id: Set(user_id),
        order_time: Set(Utc::now().into()),
        status: Set(cafeteria_order::STATUS_PENDING.to_string()),
        payment_method: Set(input.payment_method),
        payment_status: Set("PENDING".to_string()),
        delivery_location: Set(input.delivery_location),
        remarks: Set(input.remarks),
        total_cents: Set(total_cents),
    }
    .insert(&txn)
    .await?;

    let mut items = Vec::with_capacity(lines.len());
    for line in lines {
        items.push(line.insert(&txn).await?);
    }
    txn.commit().await?;
    info!(order_id = %order.id, total_cents = order.total_cents, "cafeteria_order_created");
    Ok(OrderDetails { order, items })
}

async fn unit_price<C: ConnectionTrait>(conn: &C, item_id: Uuid) -> Result<i64, ServiceError> {
    cafeteria_item::Entity::find_by_id(item_id)
        .one(conn)
        .await?
        .map(|i| i.price_cents)
        .ok_or_else(|| ServiceError::not_found("cafeteria item"))
}

pub async fn get_order(db: &DatabaseConnection, id: Uuid) -> Result<OrderDetails, ServiceError> {
    let order = cafeteria_order::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("order"))?;
    let items = list_items_of_order(db, id).await?;
    Ok(OrderDetails { order, items })
}

pub async fn list_items_of_order(db: &DatabaseConnection, order_id: Uuid) -> Result<Vec<cafeteria_order_item::Model>, ServiceError> {
    Ok(cafeteria_order_item::Entity::find()
        .filter(cafeteria_order_item::Column::OrderId.eq(order_id))
        .all(db)
        .await?)
}

pub async fn orders_by_user(db: &DatabaseConnection, user_id: Uuid) -> Result<Vec<cafeteria_order::Model>, ServiceError> {
    Ok(cafeteria_order::Entity::find()
        .filter(cafeteria_order::Column::UserId.eq(user_id))
        .order_by_desc(cafeteria_order::Column::OrderTime)
        .all(db)
        .await?)
}

pub async fn orders_by_status(db: &DatabaseConnection, status: &str) -> Result<Vec<cafeteria_order::Model>, ServiceError> {
    let status = errors::one_of("status", status, cafeteria_order::STATUSES)?;
    Ok(cafeteria_order::Entity::find()
        .filter(cafeteria_order::Column::Status.eq(status))
        .order_by_asc(cafeteria_order::Column::OrderTime)
        .all(db)
        .await?)
}

/// Advance an order. Cancelling puts its quantities back on the shelf.
pub async fn update_order_status(db: &DatabaseConnection, id: Uuid, status: &str) -> Result<cafeteria_order::Model, ServiceError> {
    let txn = db.begin().await?;
    let order = cafeteria_order::Entity::find_by_id(id)
        .one(&txn)
        .await?
        .ok_or_else(|| ServiceError::not_found("order"))?;
    let next = cafeteria_order::validate_transition(&order.status, status)?;

    if next == cafeteria_order::STATUS_CANCELLED {
        let lines = cafeteria_order_item::Entity::find()
            .filter(cafeteria_order_item::Column::OrderId.eq(id))
            .all(&txn)
            .await?;
        for line in lines {
            if let Some(item) = cafeteria_item::Entity::find_by_id(line.item_id).one(&txn).await? {
                let restocked = item.quantity + line.quantity;
                let mut am: cafeteria_item::ActiveModel = item.into();
                am.quantity = Set(restocked);
                am.updated_at = Set(Utc::now().into());
                am.update(&txn).await?;
            }
        }
    }

    let mut am: cafeteria_order::ActiveModel = order.into();
    am.status = Set(next);
    let saved = am.update(&txn).await?;
    txn.commit().await?;
    info!(order_id = %saved.id, status = %saved.status, "cafeteria_order_status");
    Ok(saved)
}

pub async fn update_payment_status(db: &DatabaseConnection, id: Uuid, payment_status: &str) -> Result<cafeteria_order::Model, ServiceError> {
    let payment_status = errors::one_of("payment_status", payment_status, cafeteria_order::PAYMENT_STATUSES)?;
    let order = cafeteria_order::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("order"))?;
    let mut am: cafeteria_order::ActiveModel = order.into();
    am.payment_status = Set(payment_status);
    Ok(am.update(db).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{get_db, user_with_role};
    use models::user::{self, Role};

    fn menu_item(name: &str, price_cents: i64, quantity: i32) -> NewCafeteriaItem {
        NewCafeteriaItem {
            name: name.into(),
            description: None,
            price_cents,
            quantity,
            category: "snacks".into(),
            image_url: None,
            available: true,
            preparation_time_minutes: None,
            ingredients: None,
            dietary_info: None,
        }
    }

    fn line(item_id: Uuid, quantity: i32) -> OrderLine {
        OrderLine { item_id, quantity, special_instructions: None }
    }

    #[tokio::test]
    async fn order_decrements_and_cancel_restocks() -> Result<(), anyhow::Error> {
        let Some(db) = get_db().await else { return Ok(()) };
        let buyer = user_with_role(&db, Role::Student).await?;
        let samosa = create_item(&db, menu_item("Samosa", 150, 5)).await?;
        let tea = create_item(&db, menu_item("Tea", 80, 10)).await?;

        let placed = create_order(&db, buyer.id, NewOrder {
            items: vec![line(samosa.id, 2), line(tea.id, 1), line(samosa.id, 1)],
            payment_method: Some("CARD".into()),
            delivery_location: None,
            remarks: None,
        })
        .await?;
        assert_eq!(placed.order.total_cents, 3 * 150 + 80);
        assert_eq!(placed.items.len(), 3);
        assert_eq!(get_item(&db, samosa.id).await?.quantity, 2);

        update_order_status(&db, placed.order.id, "cancelled").await?;
        assert_eq!(get_item(&db, samosa.id).await?.quantity, 5);
        assert_eq!(get_item(&db, tea.id).await?.quantity, 10);
        assert!(update_order_status(&db, placed.order.id, "READY").await.is_err());

        cafeteria_order::Entity::delete_by_id(placed.order.id).exec(&db).await?;
        delete_item(&db, samosa.id).await?;
        delete_item(&db, tea.id).await?;
        user::Entity::delete_by_id(buyer.id).exec(&db).await?;
        Ok(())
    }

    #[tokio::test]
    async fn oversell_is_rejected_without_side_effects() -> Result<(), anyhow::Error> {
        let Some(db) = get_db().await else { return Ok(()) };
        let buyer = user_with_role(&db, Role::Staff).await?;
        let cake = create_item(&db, menu_item("Cake slice", 300, 2)).await?;

        let err = create_order(&db, buyer.id, NewOrder {
            items: vec![line(cake.id, 1), line(cake.id, 2)],
            payment_method: None,
            delivery_location: None,
            remarks: None,
        })
        .await;
        assert!(matches!(err, Err(ServiceError::Model(_))));
        assert_eq!(get_item(&db, cake.id).await?.quantity, 2);
        assert!(orders_by_user(&db, buyer.id).await?.is_empty());

        delete_item(&db, cake.id).await?;
        user::Entity::delete_by_id(buyer.id).exec(&db).await?;
        Ok(())
    }

    #[tokio::test]
    async fn huge_line_quantity_is_a_validation_error() -> Result<(), anyhow::Error> {
        let Some(db) = get_db().await else { return Ok(()) };
        let buyer = user_with_role(&db, Role::Student).await?;
        let tea = create_item(&db, menu_item("Masala tea", 80, 10)).await?;

        let err = create_order(&db, buyer.id, NewOrder {
            items: vec![line(tea.id, 5), line(tea.id, i32::MAX)],
            payment_method: None,
            delivery_location: None,
            remarks: None,
        })
        .await;
        assert!(matches!(err, Err(ServiceError::Validation(_))));

        let err = create_order(&db, buyer.id, NewOrder {
            items: vec![line(tea.id, 0), line(tea.id, i32::MAX)],
            payment_method: None,
            delivery_location: None,
            remarks: None,
        })
        .await;
        assert!(matches!(err, Err(ServiceError::Validation(_))));
        assert_eq!(get_item(&db, tea.id).await?.quantity, 10);
        assert!(orders_by_user(&db, buyer.id).await?.is_empty());

        delete_item(&db, tea.id).await?;
        user::Entity::delete_by_id(buyer.id).exec(&db).await?;
        Ok(())
    }
}

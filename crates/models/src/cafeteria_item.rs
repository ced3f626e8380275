use sea_orm::{entity::prelude::*, Set, DatabaseConnection};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors::{self, ModelError};

pub const CATEGORIES: &[&str] = &["BREAKFAST", "LUNCH", "DINNER", "SNACKS", "BEVERAGES", "DESSERTS"];

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "cafeteria_item")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price_cents: i64,
    pub quantity: i32,
    pub category: String,
    pub image_url: Option<String>,
    pub available: bool,
    pub preparation_time_minutes: Option<i32>,
    pub ingredients: Option<String>,
    pub dietary_info: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Ensure `requested` units can be sold right now.
    pub fn check_orderable(&self, requested: i32) -> Result<(), ModelError> {
        if requested < 1 {
            return Err(ModelError::Validation(format!("quantity for {} must be >= 1", self.name)));
        }
        if !self.available {
            return Err(ModelError::Validation(format!("item not available: {}", self.name)));
        }
        if self.quantity < requested {
            return Err(ModelError::Validation(format!("insufficient quantity for item: {}", self.name)));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct NewCafeteriaItem {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price_cents: i64,
    #[serde(default)]
    pub quantity: i32,
    pub category: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default = "default_true")]
    pub available: bool,
    #[serde(default)]
    pub preparation_time_minutes: Option<i32>,
    #[serde(default)]
    pub ingredients: Option<String>,
    #[serde(default)]
    pub dietary_info: Option<String>,
}

fn default_true() -> bool { true }

/// Ceiling for a single menu price.
pub const MAX_PRICE_CENTS: i64 = 10_000_000;

pub fn validate_price(price_cents: i64) -> Result<(), ModelError> {
    if price_cents < 0 { return Err(ModelError::Validation("price must be >= 0".into())); }
    if price_cents > MAX_PRICE_CENTS {
        return Err(ModelError::Validation(format!("price must be <= {MAX_PRICE_CENTS} cents")));
    }
    Ok(())
}

pub async fn create(db: &DatabaseConnection, input: NewCafeteriaItem) -> Result<Model, ModelError> {
    errors::require("name", &input.name)?;
    validate_price(input.price_cents)?;
    if input.quantity < 0 { return Err(ModelError::Validation("quantity must be >= 0".into())); }
    let category = errors::one_of("category", &input.category, CATEGORIES)?;
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(input.name.trim().to_string()),
        description: Set(input.description),
        price_cents: Set(input.price_cents),
        quantity: Set(input.quantity),
        category: Set(category),
        image_url: Set(input.image_url),
        available: Set(input.available),
        preparation_time_minutes: Set(input.preparation_time_minutes),
        ingredients: Set(input.ingredients),
        dietary_info: Set(input.dietary_info),
        created_at: Set(now),
        updated_at: Set(now),
    };
    am.insert(db).await.map_err(|e| ModelError::Db(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(quantity: i32, available: bool) -> Model {
        let now = Utc::now().into();
        Model {
            id: Uuid::new_v4(),
            name: "Veg Wrap".into(),
            description: None,
            price_cents: 450,
            quantity,
            category: "LUNCH".into(),
            image_url: None,
            available,
            preparation_time_minutes: Some(5),
            ingredients: None,
            dietary_info: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn price_bounds() {
        assert!(validate_price(0).is_ok());
        assert!(validate_price(MAX_PRICE_CENTS).is_ok());
        assert!(validate_price(-1).is_err());
        assert!(validate_price(MAX_PRICE_CENTS + 1).is_err());
    }

    #[test]
    fn orderable_checks() {
        assert!(item(3, true).check_orderable(3).is_ok());
        assert!(item(2, true).check_orderable(3).is_err());
        assert!(item(10, false).check_orderable(1).is_err());
        assert!(item(10, true).check_orderable(0).is_err());
    }
}

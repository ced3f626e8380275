use sea_orm::entity::prelude::*;
use uuid::Uuid;
use serde::{Deserialize, Serialize};

use crate::{cafeteria_item, cafeteria_order};

/// One line of an order; `unit_price_cents` is frozen at order time.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "cafeteria_order_item")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub order_id: Uuid,
    pub item_id: Uuid,
    pub quantity: i32,
    pub unit_price_cents: i64,
    pub special_instructions: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Order,
    Item,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Order => Entity::belongs_to(cafeteria_order::Entity).from(Column::OrderId).to(cafeteria_order::Column::Id).into(),
            Relation::Item => Entity::belongs_to(cafeteria_item::Entity).from(Column::ItemId).to(cafeteria_item::Column::Id).into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Sum of `unit_price * quantity` over the lines; `None` on overflow.
pub fn total_cents(lines: &[(i64, i32)]) -> Option<i64> {
    lines
        .iter()
        .try_fold(0i64, |acc, (price, qty)| price.checked_mul(i64::from(*qty)).and_then(|line| acc.checked_add(line)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn totals_multiply_price_by_quantity() {
        assert_eq!(total_cents(&[(250, 2), (100, 3)]), Some(800));
        assert_eq!(total_cents(&[]), Some(0));
    }

    #[test]
    fn overflowing_totals_are_none() {
        assert_eq!(total_cents(&[(i64::MAX, 2)]), None);
        assert_eq!(total_cents(&[(i64::MAX, 1), (1, 1)]), None);
    }
}

use crate::{cafeteria_item, user};
use sea_orm::{ActiveModelTrait, EntityTrait, Set, TransactionTrait};
use anyhow::Result;
use chrono::Utc;
use uuid::Uuid;

use super::setup_test_db;

/// Rolled back inserts leave nothing behind
#[tokio::test]
async fn test_transaction_rollback() -> Result<()> {
    let Some(db) = setup_test_db().await else { return Ok(()) };

    let id = Uuid::new_v4();
    let now = Utc::now().into();
    let txn = db.begin().await?;
    let am = cafeteria_item::ActiveModel {
        id: Set(id),
        name: Set("Rollback Soup".into()),
        description: Set(None),
        price_cents: Set(300),
        quantity: Set(5),
        category: Set("LUNCH".into()),
        image_url: Set(None),
        available: Set(true),
        preparation_time_minutes: Set(None),
        ingredients: Set(None),
        dietary_info: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    };
    am.insert(&txn).await?;
    txn.rollback().await?;

    assert!(cafeteria_item::Entity::find_by_id(id).one(&db).await?.is_none());
    Ok(())
}

/// Committed inserts are visible outside the transaction
#[tokio::test]
async fn test_transaction_commit() -> Result<()> {
    let Some(db) = setup_test_db().await else { return Ok(()) };

    let username = format!("tx{}", &Uuid::new_v4().simple().to_string()[..10]);
    let now = Utc::now().into();
    let txn = db.begin().await?;
    let am = user::ActiveModel {
        id: Set(Uuid::new_v4()),
        username: Set(username.clone()),
        full_name: Set("Tx User".into()),
        email: Set(format!("{username}@campus.edu")),
        phone: Set(None),
        role: Set(user::Role::Staff.as_str().into()),
        enabled: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
    };
    let created = am.insert(&txn).await?;
    txn.commit().await?;

    let found = user::Entity::find_by_id(created.id).one(&db).await?;
    assert!(found.is_some());
    user::Entity::delete_by_id(created.id).exec(&db).await?;
    Ok(())
}

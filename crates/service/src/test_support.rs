#![cfg(test)]
use tokio::sync::OnceCell;
use sea_orm::DatabaseConnection;
use migration::MigratorTrait;
use models::db::{connect_with_config, database_config};

// Migrations run once per test process; `false` records that no database is usable
static MIGRATED: OnceCell<bool> = OnceCell::const_new();

/// Fresh connection for the current test's runtime, or `None` when DB tests are skipped.
pub async fn get_db() -> Option<DatabaseConnection> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return None;
    }
    let ready = *MIGRATED
        .get_or_init(|| async {
            let mut cfg = database_config();
            cfg.min_connections = 1;
            cfg.connect_timeout_secs = 5;
            cfg.acquire_timeout_secs = 5;
            let db = match connect_with_config(&cfg).await {
                Ok(db) => db,
                Err(e) => {
                    eprintln!("skip: cannot connect to db: {}", e);
                    return false;
                }
            };
            match migration::Migrator::up(&db, None).await {
                Ok(()) => true,
                Err(e) => {
                    eprintln!("skip: migrate up failed: {}", e);
                    false
                }
            }
        })
        .await;
    if !ready {
        return None;
    }

    let mut cfg = database_config();
    cfg.min_connections = 1;
    cfg.max_connections = cfg.max_connections.max(5);
    cfg.acquire_timeout_secs = 10;
    connect_with_config(&cfg).await.ok()
}

/// Insert a throwaway user with `role`.
pub async fn user_with_role(db: &DatabaseConnection, role: models::user::Role) -> anyhow::Result<models::user::Model> {
    let tag = uuid::Uuid::new_v4().simple().to_string();
    let username = format!("t{}", &tag[..12]);
    Ok(models::user::create(db, &username, "Test Person", &format!("{username}@campus.edu"), None, role).await?)
}

#![allow(clippy::unwrap_used, clippy::expect_used)]
#![allow(dead_code)]

pub mod migration;
pub mod notification;
pub mod profile;
pub mod user;

use sea_orm::{ActiveModelTrait, ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;

/// In-memory `SQLite` database with the test schema applied.
///
/// A single pooled connection keeps every query on the same in-memory database.
pub async fn setup_db() -> DatabaseConnection {
    let mut opts = ConnectOptions::new("sqlite::memory:");
    opts.max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);

    let db = Database::connect(opts)
        .await
        .expect("Failed to connect to database");
    migration::Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    db
}

/// Inserts a user with the given email and optional explicit settings.
pub async fn create_user(
    db: &DatabaseConnection,
    email: &str,
    settings: Option<serde_json::Value>,
) -> user::Model {
    let mut user = user::ActiveModel {
        email: sea_orm::ActiveValue::Set(email.to_owned()),
        ..<user::ActiveModel as sea_orm::ActiveModelBehavior>::new()
    };
    if let Some(settings) = settings {
        modkit_settings_bag::HasSettings::put_settings(&mut user, &settings).unwrap();
    }
    user.insert(db).await.expect("Failed to insert user")
}

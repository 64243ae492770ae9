use super::Store;
use nudge_core::config::MemoryConfig;
use nudge_core::traits::UserStore;
use nudge_core::user::{UserId, UserRecord};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;

/// Create an in-memory store for testing.
async fn test_store() -> Store {
    let opts = SqliteConnectOptions::from_str("sqlite::memory:")
        .unwrap()
        .create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(opts)
        .await
        .unwrap();
    Store::run_migrations(&pool).await.unwrap();
    Store { pool }
}

#[tokio::test]
async fn test_upsert_and_list() {
    let store = test_store().await;
    store.upsert_user(UserId(2), "Boris", 40).await.unwrap();
    store.upsert_user(UserId(1), "Anna", 30).await.unwrap();

    let users = store.list_users().await.unwrap();
    assert_eq!(
        users,
        vec![
            UserRecord {
                id: UserId(1),
                name: "Anna".into(),
                age: 30
            },
            UserRecord {
                id: UserId(2),
                name: "Boris".into(),
                age: 40
            },
        ]
    );
}

#[tokio::test]
async fn test_upsert_overwrites_same_id() {
    let store = test_store().await;
    store.upsert_user(UserId(7), "Anna", 30).await.unwrap();
    store.upsert_user(UserId(7), "Anya", 31).await.unwrap();

    let users = store.list_users().await.unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].name, "Anya");
    assert_eq!(users[0].age, 31);
    assert_eq!(store.count_users().await.unwrap(), 1);
}

#[tokio::test]
async fn test_empty_store() {
    let store = test_store().await;
    assert!(store.list_users().await.unwrap().is_empty());
    assert_eq!(store.count_users().await.unwrap(), 0);
}

#[tokio::test]
async fn test_migrations_are_idempotent() {
    let store = test_store().await;
    store.upsert_user(UserId(1), "Anna", 30).await.unwrap();
    Store::run_migrations(&store.pool).await.unwrap();
    assert_eq!(store.count_users().await.unwrap(), 1);
}

#[tokio::test]
async fn test_trait_object_dispatch() {
    let store = test_store().await;
    let dyn_store: &dyn UserStore = &store;
    dyn_store.upsert_user(UserId(-5), "Group", 0).await.unwrap();
    let users = dyn_store.list_users().await.unwrap();
    assert_eq!(users[0].id, UserId(-5));
}

#[tokio::test]
async fn test_new_creates_database_file() {
    let dir = std::env::temp_dir().join(format!("__nudge_store_{}__", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    let db_path = dir.join("data/users.db");
    let config = MemoryConfig {
        db_path: db_path.to_string_lossy().into_owned(),
    };

    let store = Store::new(&config).await.unwrap();
    store.upsert_user(UserId(1), "Anna", 30).await.unwrap();
    assert!(db_path.exists());

    let _ = std::fs::remove_dir_all(&dir);
}

//! Registered users: upsert and listing.

use super::Store;
use async_trait::async_trait;
use nudge_core::{
    error::NudgeError,
    traits::UserStore,
    user::{UserId, UserRecord},
};

impl Store {
    /// Insert or overwrite a user (last write wins).
    pub async fn upsert_user(&self, id: UserId, name: &str, age: i64) -> Result<(), NudgeError> {
        sqlx::query(
            "INSERT INTO users (id, name, age) VALUES (?, ?, ?) \
             ON CONFLICT(id) DO UPDATE SET name = excluded.name, age = excluded.age, \
             updated_at = datetime('now')",
        )
        .bind(id.0)
        .bind(name)
        .bind(age)
        .execute(&self.pool)
        .await
        .map_err(|e| NudgeError::Memory(format!("upsert user failed: {e}")))?;

        Ok(())
    }

    /// All users ordered by id.
    pub async fn list_users(&self) -> Result<Vec<UserRecord>, NudgeError> {
        let rows: Vec<(i64, String, i64)> =
            sqlx::query_as("SELECT id, name, age FROM users ORDER BY id")
                .fetch_all(&self.pool)
                .await
                .map_err(|e| NudgeError::Memory(format!("query failed: {e}")))?;

        Ok(rows
            .into_iter()
            .map(|(id, name, age)| UserRecord {
                id: UserId(id),
                name,
                age,
            })
            .collect())
    }

    /// Number of registered users.
    pub async fn count_users(&self) -> Result<i64, NudgeError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| NudgeError::Memory(format!("query failed: {e}")))?;

        Ok(count)
    }
}

#[async_trait]
impl UserStore for Store {
    async fn upsert_user(&self, id: UserId, name: &str, age: i64) -> Result<(), NudgeError> {
        Store::upsert_user(self, id, name, age).await
    }

    async fn list_users(&self) -> Result<Vec<UserRecord>, NudgeError> {
        Store::list_users(self).await
    }
}

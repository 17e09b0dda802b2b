use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use ts_rs::TS;

/// A local account, keyed by the identity provider's subject id.
/// Created lazily on first authenticated interaction; never deleted.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct User {
    pub id: i64,
    pub owner_id: String,
    pub name: Option<String>,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub async fn find_by_owner_id(
        pool: &SqlitePool,
        owner_id: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"SELECT id, owner_id, name, is_admin, created_at
               FROM users
               WHERE owner_id = $1"#,
        )
        .bind(owner_id)
        .fetch_optional(pool)
        .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"SELECT id, owner_id, name, is_admin, created_at
               FROM users
               WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    pub async fn find_all(pool: &SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"SELECT id, owner_id, name, is_admin, created_at
               FROM users
               ORDER BY id"#,
        )
        .fetch_all(pool)
        .await
    }

    pub async fn create(
        pool: &SqlitePool,
        owner_id: &str,
        name: Option<&str>,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"INSERT INTO users (owner_id, name)
               VALUES ($1, $2)
               RETURNING id, owner_id, name, is_admin, created_at"#,
        )
        .bind(owner_id)
        .bind(name)
        .fetch_one(pool)
        .await
    }

    pub async fn set_admin(
        pool: &SqlitePool,
        owner_id: &str,
        is_admin: bool,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"UPDATE users
               SET is_admin = $2
               WHERE owner_id = $1
               RETURNING id, owner_id, name, is_admin, created_at"#,
        )
        .bind(owner_id)
        .bind(is_admin)
        .fetch_optional(pool)
        .await
    }

    pub async fn is_admin(pool: &SqlitePool, owner_id: &str) -> Result<bool, sqlx::Error> {
        let user = Self::find_by_owner_id(pool, owner_id).await?;
        Ok(user.map(|u| u.is_admin).unwrap_or(false))
    }
}

#[cfg(test)]
mod tests {
    use crate::DBService;

    use super::*;

    #[tokio::test]
    async fn create_and_find_by_owner_id() {
        let db = DBService::new_in_memory().await.unwrap();

        let user = User::create(&db.pool, "auth0|alice", Some("Alice"))
            .await
            .unwrap();
        assert_eq!(user.owner_id, "auth0|alice");
        assert!(!user.is_admin);

        let found = User::find_by_owner_id(&db.pool, "auth0|alice")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id, user.id);

        assert!(
            User::find_by_owner_id(&db.pool, "auth0|nobody")
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn owner_id_is_unique() {
        let db = DBService::new_in_memory().await.unwrap();

        User::create(&db.pool, "auth0|alice", Some("Alice"))
            .await
            .unwrap();
        let duplicate = User::create(&db.pool, "auth0|alice", Some("Alice 2")).await;

        assert!(duplicate.is_err());
    }

    #[tokio::test]
    async fn admin_flag_defaults_to_false_and_can_be_set() {
        let db = DBService::new_in_memory().await.unwrap();

        User::create(&db.pool, "auth0|bob", None).await.unwrap();
        assert!(!User::is_admin(&db.pool, "auth0|bob").await.unwrap());
        // Unknown users are never admins.
        assert!(!User::is_admin(&db.pool, "auth0|ghost").await.unwrap());

        let updated = User::set_admin(&db.pool, "auth0|bob", true)
            .await
            .unwrap()
            .unwrap();
        assert!(updated.is_admin);
        assert!(User::is_admin(&db.pool, "auth0|bob").await.unwrap());
    }
}

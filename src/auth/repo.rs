use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: OffsetDateTime,
}

impl User {
    pub async fn find_by_email(db: &PgPool, email: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    /// Inserts a user row. The `users.email` unique constraint is the
    /// arbiter for concurrent registrations; the caller distinguishes
    /// that case with [`crate::error::is_unique_violation`].
    pub async fn create(
        db: &PgPool,
        name: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, name, email, password_hash, created_at
            "#,
        )
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .fetch_one(db)
        .await
    }

    pub async fn update(
        db: &PgPool,
        id: Uuid,
        name: Option<&str>,
        email: Option<&str>,
        password_hash: Option<&str>,
    ) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET name          = COALESCE($2, name),
                email         = COALESCE($3, email),
                password_hash = COALESCE($4, password_hash)
            WHERE id = $1
            RETURNING id, name, email, password_hash, created_at
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .fetch_one(db)
        .await
    }
}

#[cfg(test)]
mod db_tests {
    use super::*;
    use crate::error::is_unique_violation;

    #[sqlx::test]
    async fn duplicate_email_is_a_unique_violation(db: PgPool) {
        User::create(&db, "First", "dup@example.com", "hash")
            .await
            .expect("first registration");

        // The loser of a concurrent-registration race lands here, past
        // any application-level existence check
        let err = User::create(&db, "Second", "dup@example.com", "hash")
            .await
            .unwrap_err();
        assert!(is_unique_violation(&err));
    }

    #[sqlx::test]
    async fn update_to_taken_email_is_a_unique_violation(db: PgPool) {
        let first = User::create(&db, "First", "first@example.com", "hash")
            .await
            .expect("first user");
        User::create(&db, "Second", "second@example.com", "hash")
            .await
            .expect("second user");

        let err = User::update(&db, first.id, None, Some("second@example.com"), None)
            .await
            .unwrap_err();
        assert!(is_unique_violation(&err));
    }
}

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Comment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub recipe_id: Uuid,
    pub text: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CommentWithAuthor {
    pub id: Uuid,
    pub user_id: Uuid,
    pub recipe_id: Uuid,
    pub text: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
    pub author_name: String,
    pub author_email: String,
}

impl Comment {
    pub async fn create(
        db: &PgPool,
        user_id: Uuid,
        recipe_id: Uuid,
        text: &str,
    ) -> anyhow::Result<Comment> {
        let comment = sqlx::query_as::<_, Comment>(
            r#"
            INSERT INTO comments (user_id, recipe_id, text)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, recipe_id, text, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(recipe_id)
        .bind(text)
        .fetch_one(db)
        .await?;
        Ok(comment)
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<Comment>> {
        let comment = sqlx::query_as::<_, Comment>(
            r#"
            SELECT id, user_id, recipe_id, text, created_at, updated_at
            FROM comments
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(comment)
    }

    /// Newest first, with the commenter's public fields joined in.
    pub async fn list_for_recipe(
        db: &PgPool,
        recipe_id: Uuid,
    ) -> anyhow::Result<Vec<CommentWithAuthor>> {
        let rows = sqlx::query_as::<_, CommentWithAuthor>(
            r#"
            SELECT c.id, c.user_id, c.recipe_id, c.text, c.created_at, c.updated_at,
                   u.name AS author_name, u.email AS author_email
            FROM comments c
            JOIN users u ON u.id = c.user_id
            WHERE c.recipe_id = $1
            ORDER BY c.created_at DESC
            "#,
        )
        .bind(recipe_id)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn update_text(db: &PgPool, id: Uuid, text: &str) -> anyhow::Result<Comment> {
        let comment = sqlx::query_as::<_, Comment>(
            r#"
            UPDATE comments
            SET text = $2, updated_at = now()
            WHERE id = $1
            RETURNING id, user_id, recipe_id, text, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(text)
        .fetch_one(db)
        .await?;
        Ok(comment)
    }

    pub async fn delete(db: &PgPool, id: Uuid) -> anyhow::Result<()> {
        sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(())
    }
}

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Recipe {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub ingredients: Vec<String>,
    pub steps: Vec<String>,
    pub category: String,
    pub tags: Vec<String>,
    pub image: String,
    pub created_by: Uuid,
    pub average_rating: f64,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Recipe row with its author's public fields joined in.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct RecipeWithAuthor {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub ingredients: Vec<String>,
    pub steps: Vec<String>,
    pub category: String,
    pub tags: Vec<String>,
    pub image: String,
    pub created_by: Uuid,
    pub average_rating: f64,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
    pub author_name: String,
    pub author_email: String,
}

const RECIPE_COLUMNS: &str = "id, title, description, ingredients, steps, category, tags, image, \
                              created_by, average_rating, created_at, updated_at";

const JOINED_COLUMNS: &str = "r.id, r.title, r.description, r.ingredients, r.steps, r.category, \
                              r.tags, r.image, r.created_by, r.average_rating, r.created_at, \
                              r.updated_at, u.name AS author_name, u.email AS author_email";

impl Recipe {
    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        db: &PgPool,
        created_by: Uuid,
        title: &str,
        description: &str,
        ingredients: &[String],
        steps: &[String],
        category: &str,
        tags: &[String],
        image: &str,
    ) -> anyhow::Result<Recipe> {
        let recipe = sqlx::query_as::<_, Recipe>(&format!(
            r#"
            INSERT INTO recipes (title, description, ingredients, steps, category, tags, image, created_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {RECIPE_COLUMNS}
            "#,
        ))
        .bind(title)
        .bind(description)
        .bind(ingredients)
        .bind(steps)
        .bind(category)
        .bind(tags)
        .bind(image)
        .bind(created_by)
        .fetch_one(db)
        .await?;
        Ok(recipe)
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<Recipe>> {
        let recipe = sqlx::query_as::<_, Recipe>(&format!(
            r#"
            SELECT {RECIPE_COLUMNS}
            FROM recipes
            WHERE id = $1
            "#,
        ))
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(recipe)
    }

    pub async fn exists(db: &PgPool, id: Uuid) -> anyhow::Result<bool> {
        let found: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM recipes WHERE id = $1")
            .bind(id)
            .fetch_optional(db)
            .await?;
        Ok(found.is_some())
    }

    pub async fn find_with_author(
        db: &PgPool,
        id: Uuid,
    ) -> anyhow::Result<Option<RecipeWithAuthor>> {
        let recipe = sqlx::query_as::<_, RecipeWithAuthor>(&format!(
            r#"
            SELECT {JOINED_COLUMNS}
            FROM recipes r
            JOIN users u ON u.id = r.created_by
            WHERE r.id = $1
            "#,
        ))
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(recipe)
    }

    pub async fn list(
        db: &PgPool,
        limit: i64,
        offset: i64,
    ) -> anyhow::Result<Vec<RecipeWithAuthor>> {
        let rows = sqlx::query_as::<_, RecipeWithAuthor>(&format!(
            r#"
            SELECT {JOINED_COLUMNS}
            FROM recipes r
            JOIN users u ON u.id = r.created_by
            ORDER BY r.created_at DESC
            LIMIT $1 OFFSET $2
            "#,
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn list_by_owner(
        db: &PgPool,
        owner: Uuid,
        limit: i64,
        offset: i64,
    ) -> anyhow::Result<Vec<RecipeWithAuthor>> {
        let rows = sqlx::query_as::<_, RecipeWithAuthor>(&format!(
            r#"
            SELECT {JOINED_COLUMNS}
            FROM recipes r
            JOIN users u ON u.id = r.created_by
            WHERE r.created_by = $1
            ORDER BY r.created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        ))
        .bind(owner)
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn update(
        db: &PgPool,
        id: Uuid,
        title: Option<&str>,
        description: Option<&str>,
        ingredients: Option<&[String]>,
        steps: Option<&[String]>,
        category: Option<&str>,
        tags: Option<&[String]>,
        image: Option<&str>,
    ) -> anyhow::Result<Recipe> {
        let recipe = sqlx::query_as::<_, Recipe>(&format!(
            r#"
            UPDATE recipes
            SET title       = COALESCE($2, title),
                description = COALESCE($3, description),
                ingredients = COALESCE($4, ingredients),
                steps       = COALESCE($5, steps),
                category    = COALESCE($6, category),
                tags        = COALESCE($7, tags),
                image       = COALESCE($8, image),
                updated_at  = now()
            WHERE id = $1
            RETURNING {RECIPE_COLUMNS}
            "#,
        ))
        .bind(id)
        .bind(title)
        .bind(description)
        .bind(ingredients)
        .bind(steps)
        .bind(category)
        .bind(tags)
        .bind(image)
        .fetch_one(db)
        .await?;
        Ok(recipe)
    }

    pub async fn delete(db: &PgPool, id: Uuid) -> anyhow::Result<()> {
        sqlx::query("DELETE FROM recipes WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(())
    }
}

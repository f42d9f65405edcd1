use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::{FromRow, PgPool};
use time::{format_description::well_known::Rfc3339, OffsetDateTime};
use uuid::Uuid;

/// One user's 1-5 evaluation of a recipe. `reviews` is a JSON list of
/// `{review, created_at}` entries, empty when no text was given.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Rating {
    pub id: Uuid,
    pub user_id: Uuid,
    pub recipe_id: Uuid,
    pub rating: i32,
    pub reviews: serde_json::Value,
    pub created_at: OffsetDateTime,
}

/// Builds the `reviews` column value for a new rating.
pub fn review_entries(review: Option<&str>) -> serde_json::Value {
    match review {
        Some(text) if !text.trim().is_empty() => {
            let created_at = OffsetDateTime::now_utc()
                .format(&Rfc3339)
                .unwrap_or_default();
            json!([{ "review": text, "created_at": created_at }])
        }
        _ => json!([]),
    }
}

impl Rating {
    /// Inserts a rating row. The `ratings_user_recipe_key` unique
    /// constraint is the arbiter for concurrent duplicate submissions;
    /// the caller distinguishes that case with
    /// [`crate::error::is_unique_violation`].
    pub async fn insert(
        db: &PgPool,
        user_id: Uuid,
        recipe_id: Uuid,
        rating: i32,
        reviews: serde_json::Value,
    ) -> Result<Rating, sqlx::Error> {
        sqlx::query_as::<_, Rating>(
            r#"
            INSERT INTO ratings (user_id, recipe_id, rating, reviews)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, recipe_id, rating, reviews, created_at
            "#,
        )
        .bind(user_id)
        .bind(recipe_id)
        .bind(rating)
        .bind(reviews)
        .fetch_one(db)
        .await
    }

    /// Full recompute of the recipe's cached average as one atomic
    /// statement, so no read-then-write window exists in the
    /// application tier. Self-heals on the next rating if a previous
    /// refresh failed.
    pub async fn refresh_recipe_average(db: &PgPool, recipe_id: Uuid) -> anyhow::Result<f64> {
        let (average,): (f64,) = sqlx::query_as(
            r#"
            UPDATE recipes
            SET average_rating = (
                SELECT COALESCE(AVG(rating)::float8, 0)
                FROM ratings
                WHERE recipe_id = $1
            )
            WHERE id = $1
            RETURNING average_rating
            "#,
        )
        .bind(recipe_id)
        .fetch_one(db)
        .await?;
        Ok(average)
    }
}

#[cfg(test)]
mod db_tests {
    use super::*;
    use crate::error::is_unique_violation;
    use crate::recipes::repo::Recipe;

    async fn seed_user(db: &PgPool, email: &str) -> Uuid {
        let (id,): (Uuid,) = sqlx::query_as(
            "INSERT INTO users (name, email, password_hash) VALUES ('Cook', $1, 'x') RETURNING id",
        )
        .bind(email)
        .fetch_one(db)
        .await
        .expect("seed user");
        id
    }

    async fn seed_recipe(db: &PgPool, owner: Uuid) -> Recipe {
        Recipe::create(
            db,
            owner,
            "Carbonara",
            "Roman pasta",
            &["spaghetti".into(), "guanciale".into()],
            &["boil".into(), "toss".into()],
            "Pasta",
            &[],
            "",
        )
        .await
        .expect("seed recipe")
    }

    async fn rating_count(db: &PgPool, user_id: Uuid, recipe_id: Uuid) -> i64 {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM ratings WHERE user_id = $1 AND recipe_id = $2")
                .bind(user_id)
                .bind(recipe_id)
                .fetch_one(db)
                .await
                .expect("count ratings");
        count
    }

    #[sqlx::test]
    async fn average_tracks_each_insert_and_duplicate_is_rejected(db: PgPool) {
        let owner = seed_user(&db, "owner@example.com").await;
        let recipe = seed_recipe(&db, owner).await;
        assert_eq!(recipe.average_rating, 0.0);

        let alice = seed_user(&db, "alice@example.com").await;
        let bob = seed_user(&db, "bob@example.com").await;

        Rating::insert(&db, alice, recipe.id, 4, serde_json::json!([]))
            .await
            .expect("first rating");
        let average = Rating::refresh_recipe_average(&db, recipe.id)
            .await
            .expect("refresh");
        assert!((average - 4.0).abs() < f64::EPSILON);

        Rating::insert(&db, bob, recipe.id, 5, serde_json::json!([]))
            .await
            .expect("second rating");
        let average = Rating::refresh_recipe_average(&db, recipe.id)
            .await
            .expect("refresh");
        assert!((average - 4.5).abs() < f64::EPSILON);

        // A second submission from the same user hits the unique index,
        // leaves no second row and does not move the average
        let err = Rating::insert(&db, alice, recipe.id, 1, serde_json::json!([]))
            .await
            .unwrap_err();
        assert!(is_unique_violation(&err));
        assert_eq!(rating_count(&db, alice, recipe.id).await, 1);

        let stored = Recipe::find_by_id(&db, recipe.id)
            .await
            .expect("reload")
            .expect("recipe exists");
        assert!((stored.average_rating - 4.5).abs() < f64::EPSILON);
    }

    #[sqlx::test]
    async fn average_equals_mean_of_all_persisted_values(db: PgPool) {
        let owner = seed_user(&db, "owner@example.com").await;
        let recipe = seed_recipe(&db, owner).await;

        let values = [5, 3, 4, 2, 5];
        for (i, value) in values.iter().enumerate() {
            let rater = seed_user(&db, &format!("rater{i}@example.com")).await;
            Rating::insert(&db, rater, recipe.id, *value, serde_json::json!([]))
                .await
                .expect("rating");
            Rating::refresh_recipe_average(&db, recipe.id)
                .await
                .expect("refresh");
        }

        let expected = values.iter().sum::<i32>() as f64 / values.len() as f64;
        let stored = Recipe::find_by_id(&db, recipe.id)
            .await
            .expect("reload")
            .expect("recipe exists");
        assert!((stored.average_rating - expected).abs() < 1e-9);
    }

    #[sqlx::test]
    async fn recompute_only_touches_the_rated_recipe(db: PgPool) {
        let owner = seed_user(&db, "owner@example.com").await;
        let rated = seed_recipe(&db, owner).await;
        let untouched = seed_recipe(&db, owner).await;

        let rater = seed_user(&db, "rater@example.com").await;
        Rating::insert(&db, rater, rated.id, 5, serde_json::json!([]))
            .await
            .expect("rating");
        Rating::refresh_recipe_average(&db, rated.id)
            .await
            .expect("refresh");

        let other = Recipe::find_by_id(&db, untouched.id)
            .await
            .expect("reload")
            .expect("recipe exists");
        assert_eq!(other.average_rating, 0.0);
    }
}

use sqlx::PgPool;
use uuid::Uuid;

use crate::recipes::repo::Recipe;

/// Atomic set-add. Returns false when the recipe was already in the
/// user's saved set; concurrent saves cannot both report success.
pub async fn save(db: &PgPool, user_id: Uuid, recipe_id: Uuid) -> anyhow::Result<bool> {
    let result = sqlx::query(
        r#"
        INSERT INTO saved_recipes (user_id, recipe_id)
        VALUES ($1, $2)
        ON CONFLICT DO NOTHING
        "#,
    )
    .bind(user_id)
    .bind(recipe_id)
    .execute(db)
    .await?;
    Ok(result.rows_affected() > 0)
}

/// Atomic set-remove. Returns false when the recipe was not in the set.
pub async fn unsave(db: &PgPool, user_id: Uuid, recipe_id: Uuid) -> anyhow::Result<bool> {
    let result = sqlx::query(
        r#"
        DELETE FROM saved_recipes
        WHERE user_id = $1 AND recipe_id = $2
        "#,
    )
    .bind(user_id)
    .bind(recipe_id)
    .execute(db)
    .await?;
    Ok(result.rows_affected() > 0)
}

/// Full recipe entities in the order the user saved them.
pub async fn list_saved(db: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<Recipe>> {
    let rows = sqlx::query_as::<_, Recipe>(
        r#"
        SELECT r.id, r.title, r.description, r.ingredients, r.steps, r.category,
               r.tags, r.image, r.created_by, r.average_rating, r.created_at, r.updated_at
        FROM saved_recipes s
        JOIN recipes r ON r.id = s.recipe_id
        WHERE s.user_id = $1
        ORDER BY s.saved_at ASC
        "#,
    )
    .bind(user_id)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

#[cfg(test)]
mod db_tests {
    use super::*;

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

    async fn seed_recipe(db: &PgPool, owner: Uuid, title: &str) -> Uuid {
        Recipe::create(
            db,
            owner,
            title,
            "A recipe",
            &["something".into()],
            &["cook it".into()],
            "Misc",
            &[],
            "",
        )
        .await
        .expect("seed recipe")
        .id
    }

    #[sqlx::test]
    async fn double_save_conflicts_until_unsaved(db: PgPool) {
        let owner = seed_user(&db, "owner@example.com").await;
        let user = seed_user(&db, "saver@example.com").await;
        let recipe = seed_recipe(&db, owner, "Toast").await;

        assert!(save(&db, user, recipe).await.expect("first save"));
        assert!(!save(&db, user, recipe).await.expect("second save"));

        assert!(unsave(&db, user, recipe).await.expect("unsave"));
        assert!(save(&db, user, recipe).await.expect("save after unsave"));
    }

    #[sqlx::test]
    async fn unsave_without_membership_leaves_list_unchanged(db: PgPool) {
        let owner = seed_user(&db, "owner@example.com").await;
        let user = seed_user(&db, "saver@example.com").await;
        let saved = seed_recipe(&db, owner, "Kept").await;
        let never_saved = seed_recipe(&db, owner, "Ignored").await;

        assert!(save(&db, user, saved).await.expect("save"));
        assert!(!unsave(&db, user, never_saved).await.expect("unsave miss"));

        let list = list_saved(&db, user).await.expect("list");
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].id, saved);
    }

    #[sqlx::test]
    async fn list_saved_preserves_save_order(db: PgPool) {
        let owner = seed_user(&db, "owner@example.com").await;
        let user = seed_user(&db, "saver@example.com").await;

        assert!(list_saved(&db, user).await.expect("empty list").is_empty());

        let first = seed_recipe(&db, owner, "First").await;
        let second = seed_recipe(&db, owner, "Second").await;

        assert!(save(&db, user, first).await.expect("save first"));
        assert!(save(&db, user, second).await.expect("save second"));

        let list = list_saved(&db, user).await.expect("list");
        let ids: Vec<Uuid> = list.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![first, second]);

        assert!(unsave(&db, user, first).await.expect("unsave first"));
        let list = list_saved(&db, user).await.expect("list again");
        let ids: Vec<Uuid> = list.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![second]);
    }
}

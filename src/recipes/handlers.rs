use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{auth::AuthUser, error::ApiError, state::AppState};

use super::dto::{CreateRecipeRequest, Pagination, UpdateRecipeRequest};
use super::repo::{Recipe, RecipeWithAuthor};

pub fn recipe_routes() -> Router<AppState> {
    Router::new()
        .route("/recipe", post(create_recipe).get(list_recipes))
        .route("/recipe/my-recipes", get(my_recipes))
        .route(
            "/recipe/:id",
            get(get_recipe).put(update_recipe).delete(delete_recipe),
        )
}

#[instrument(skip(state, payload))]
pub async fn create_recipe(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<CreateRecipeRequest>,
) -> Result<(StatusCode, Json<Recipe>), ApiError> {
    payload.validate().map_err(ApiError::Validation)?;

    let recipe = Recipe::create(
        &state.db,
        user_id,
        payload.title.trim(),
        payload.description.trim(),
        &payload.ingredients,
        &payload.steps,
        payload.category.trim(),
        &payload.tags,
        &payload.image,
    )
    .await?;

    info!(recipe_id = %recipe.id, %user_id, "recipe created");
    Ok((StatusCode::CREATED, Json(recipe)))
}

#[instrument(skip(state))]
pub async fn list_recipes(
    State(state): State<AppState>,
    Query(p): Query<Pagination>,
) -> Result<Json<Vec<RecipeWithAuthor>>, ApiError> {
    let (limit, offset) = p.clamped();
    let recipes = Recipe::list(&state.db, limit, offset).await?;
    Ok(Json(recipes))
}

#[instrument(skip(state))]
pub async fn my_recipes(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(p): Query<Pagination>,
) -> Result<Json<Vec<RecipeWithAuthor>>, ApiError> {
    // An owner with no recipes gets an empty list, not an error
    let (limit, offset) = p.clamped();
    let recipes = Recipe::list_by_owner(&state.db, user_id, limit, offset).await?;
    Ok(Json(recipes))
}

#[instrument(skip(state))]
pub async fn get_recipe(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<RecipeWithAuthor>, ApiError> {
    let recipe = Recipe::find_with_author(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Recipe not found".into()))?;
    Ok(Json(recipe))
}

#[instrument(skip(state, payload))]
pub async fn update_recipe(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateRecipeRequest>,
) -> Result<Json<Recipe>, ApiError> {
    let recipe = Recipe::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Recipe not found".into()))?;

    if recipe.created_by != user_id {
        return Err(ApiError::Forbidden("Not authorized".into()));
    }

    let updated = Recipe::update(
        &state.db,
        id,
        payload.title.as_deref(),
        payload.description.as_deref(),
        payload.ingredients.as_deref(),
        payload.steps.as_deref(),
        payload.category.as_deref(),
        payload.tags.as_deref(),
        payload.image.as_deref(),
    )
    .await?;

    info!(recipe_id = %id, %user_id, "recipe updated");
    Ok(Json(updated))
}

#[instrument(skip(state))]
pub async fn delete_recipe(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let recipe = Recipe::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Recipe not found".into()))?;

    if recipe.created_by != user_id {
        return Err(ApiError::Forbidden("Not authorized".into()));
    }

    Recipe::delete(&state.db, id).await?;

    info!(recipe_id = %id, %user_id, "recipe deleted");
    Ok(Json(json!({ "message": "Recipe deleted" })))
}

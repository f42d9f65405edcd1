use axum::{
    extract::{Path, State},
    routing::{delete, get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    auth::{repo::User, AuthUser},
    error::ApiError,
    recipes::repo::Recipe,
    state::AppState,
};

use super::repo;

pub fn saved_routes() -> Router<AppState> {
    Router::new()
        .route("/recipe/saved-recipes", get(list_saved))
        .route("/recipe/:id/save", post(save_recipe))
        .route("/recipe/:id/unsave", delete(unsave_recipe))
}

#[instrument(skip(state))]
pub async fn save_recipe(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(recipe_id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    if !Recipe::exists(&state.db, recipe_id).await? {
        return Err(ApiError::NotFound("Recipe not found".into()));
    }
    if User::find_by_id(&state.db, user_id).await?.is_none() {
        return Err(ApiError::NotFound("User not found".into()));
    }

    if !repo::save(&state.db, user_id, recipe_id).await? {
        warn!(%user_id, %recipe_id, "recipe already saved");
        return Err(ApiError::Conflict("Recipe already saved".into()));
    }

    info!(%user_id, %recipe_id, "recipe saved");
    Ok(Json(json!({ "message": "Recipe saved successfully" })))
}

#[instrument(skip(state))]
pub async fn unsave_recipe(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(recipe_id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    if User::find_by_id(&state.db, user_id).await?.is_none() {
        return Err(ApiError::NotFound("User not found".into()));
    }

    // Membership, not recipe existence, is what unsave validates
    if !repo::unsave(&state.db, user_id, recipe_id).await? {
        warn!(%user_id, %recipe_id, "recipe not in saved list");
        return Err(ApiError::Conflict("Recipe not found in saved recipes".into()));
    }

    info!(%user_id, %recipe_id, "recipe unsaved");
    Ok(Json(json!({ "message": "Recipe removed from saved recipes" })))
}

#[instrument(skip(state))]
pub async fn list_saved(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<Recipe>>, ApiError> {
    if User::find_by_id(&state.db, user_id).await?.is_none() {
        return Err(ApiError::NotFound("User not found".into()));
    }

    // An empty saved list is a valid state and returns an empty array
    let recipes = repo::list_saved(&state.db, user_id).await?;
    Ok(Json(recipes))
}

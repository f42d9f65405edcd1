use axum::{
    extract::{Path, State},
    routing::post,
    Json, Router,
};
use tracing::{error, info, instrument};
use uuid::Uuid;

use crate::{
    auth::AuthUser,
    error::{is_unique_violation, ApiError},
    recipes::repo::Recipe,
    state::AppState,
};

use super::dto::{RateRecipeRequest, RateRecipeResponse};
use super::repo::{review_entries, Rating};

pub fn rating_routes() -> Router<AppState> {
    Router::new().route("/recipe/:id/rate", post(rate_recipe))
}

/// Persists one rating per (user, recipe) and refreshes the recipe's
/// cached average before responding.
#[instrument(skip(state, payload))]
pub async fn rate_recipe(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(recipe_id): Path<Uuid>,
    Json(payload): Json<RateRecipeRequest>,
) -> Result<Json<RateRecipeResponse>, ApiError> {
    payload.validate().map_err(ApiError::Validation)?;

    if !Recipe::exists(&state.db, recipe_id).await? {
        return Err(ApiError::NotFound("Recipe not found".into()));
    }

    let reviews = review_entries(payload.review.as_deref());
    let rating = match Rating::insert(&state.db, user_id, recipe_id, payload.rating, reviews).await
    {
        Ok(r) => r,
        // The unique index is the arbiter, so two concurrent submissions
        // from the same user cannot both succeed.
        Err(e) if is_unique_violation(&e) => {
            return Err(ApiError::Conflict(
                "You have already rated this recipe".into(),
            ));
        }
        Err(e) => return Err(e.into()),
    };

    // The rating is already committed. A failed recompute leaves a stale
    // average that the next rating heals, so it is reported, not rolled back.
    let average_refreshed = match Rating::refresh_recipe_average(&state.db, recipe_id).await {
        Ok(average) => {
            info!(%recipe_id, %user_id, value = rating.rating, average, "rating added");
            true
        }
        Err(e) => {
            error!(error = %e, %recipe_id, %user_id, "rating recorded but average not refreshed");
            false
        }
    };

    Ok(Json(RateRecipeResponse {
        rating,
        average_refreshed,
    }))
}

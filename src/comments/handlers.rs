use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use serde_json::{json, Value};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{auth::AuthUser, error::ApiError, recipes::repo::Recipe, state::AppState};

use super::dto::CommentBody;
use super::repo::{Comment, CommentWithAuthor};

pub fn comment_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/recipe/:id/comments",
            get(list_comments).post(add_comment),
        )
        .route(
            "/comments/:id",
            put(update_comment).delete(delete_comment),
        )
}

#[instrument(skip(state, payload))]
pub async fn add_comment(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(recipe_id): Path<Uuid>,
    Json(payload): Json<CommentBody>,
) -> Result<(StatusCode, Json<Comment>), ApiError> {
    payload.validate().map_err(ApiError::Validation)?;

    if !Recipe::exists(&state.db, recipe_id).await? {
        return Err(ApiError::NotFound("Recipe not found".into()));
    }

    let comment = Comment::create(&state.db, user_id, recipe_id, payload.text.trim()).await?;

    info!(comment_id = %comment.id, %recipe_id, %user_id, "comment added");
    Ok((StatusCode::CREATED, Json(comment)))
}

#[instrument(skip(state))]
pub async fn list_comments(
    State(state): State<AppState>,
    Path(recipe_id): Path<Uuid>,
) -> Result<Json<Vec<CommentWithAuthor>>, ApiError> {
    if !Recipe::exists(&state.db, recipe_id).await? {
        return Err(ApiError::NotFound("Recipe not found".into()));
    }
    let comments = Comment::list_for_recipe(&state.db, recipe_id).await?;
    Ok(Json(comments))
}

#[instrument(skip(state, payload))]
pub async fn update_comment(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(comment_id): Path<Uuid>,
    Json(payload): Json<CommentBody>,
) -> Result<Json<Comment>, ApiError> {
    payload.validate().map_err(ApiError::Validation)?;

    let comment = Comment::find_by_id(&state.db, comment_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Comment not found".into()))?;

    if comment.user_id != user_id {
        return Err(ApiError::Forbidden("Not authorized".into()));
    }

    let updated = Comment::update_text(&state.db, comment_id, payload.text.trim()).await?;
    info!(%comment_id, %user_id, "comment updated");
    Ok(Json(updated))
}

#[instrument(skip(state))]
pub async fn delete_comment(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(comment_id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let comment = Comment::find_by_id(&state.db, comment_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Comment not found".into()))?;

    if comment.user_id != user_id {
        return Err(ApiError::Forbidden("Not authorized".into()));
    }

    Comment::delete(&state.db, comment_id).await?;
    info!(%comment_id, %user_id, "comment deleted");
    Ok(Json(json!({ "message": "Comment deleted" })))
}

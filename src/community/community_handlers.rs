use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::{AppError, Result},
    middleware::{AuthUser, MaybeAuthUser},
    state::AppState,
    websocket::{Audience, ServerEvent},
};

use super::community_dto::{CreateCommentRequest, CreatePostRequest, PostFilters};

/// Create a community post; broadcast to every connected client
#[utoipa::path(
    post,
    path = "/api/community/posts",
    request_body = CreatePostRequest,
    responses(
        (status = 201, description = "Post created"),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "community",
    security(("bearer_auth" = []))
)]
pub async fn create_post(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<CreatePostRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let content = payload.content.trim();
    if content.is_empty() {
        return Err(AppError::Validation("Post content is required".to_string()));
    }

    let post = state
        .post_repository
        .create(
            user_id,
            content,
            payload.is_anonymous.unwrap_or(true),
            payload.tags.as_deref().unwrap_or(&[]),
        )
        .await?;

    state.connections.publish(
        Audience::Global,
        ServerEvent::PostNew { post: post.clone() },
    );

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Post created successfully", "post": post })),
    ))
}

/// Public community feed. Anonymous requests succeed; `is_liked` is only
/// personalized when a valid credential is supplied.
#[utoipa::path(
    get,
    path = "/api/community/posts",
    params(
        ("filter" = Option<String>, Query, description = "recent | popular | my-posts"),
        ("page" = Option<i64>, Query, description = "Page number"),
        ("limit" = Option<i64>, Query, description = "Items per page")
    ),
    responses(
        (status = 200, description = "Paginated posts"),
        (status = 401, description = "my-posts filter without authentication")
    ),
    tag = "community"
)]
pub async fn get_posts(
    State(state): State<AppState>,
    MaybeAuthUser(viewer): MaybeAuthUser,
    Query(filters): Query<PostFilters>,
) -> Result<Json<serde_json::Value>> {
    let page = filters.page.unwrap_or(1).max(1);
    let limit = filters.limit.unwrap_or(20).max(1);
    let filter = filters.filter.as_deref().unwrap_or("recent");

    let author = match filter {
        "my-posts" => Some(viewer.ok_or(AppError::Unauthorized(
            "Authentication required to view your posts".to_string(),
        ))?),
        _ => None,
    };

    let mut posts = state
        .post_repository
        .find_all(author, viewer, page * limit)
        .await?;

    if filter == "popular" {
        posts.sort_by(|a, b| {
            b.likes_count
                .cmp(&a.likes_count)
                .then(b.created_at.cmp(&a.created_at))
        });
    }

    let total = posts.len() as i64;
    let total_pages = (total as f64 / limit as f64).ceil() as i64;
    let start = ((page - 1) * limit) as usize;
    let paginated: Vec<_> = posts.into_iter().skip(start).take(limit as usize).collect();

    Ok(Json(json!({
        "posts": paginated,
        "total": total,
        "current_page": page,
        "total_pages": total_pages,
    })))
}

pub async fn get_post(
    State(state): State<AppState>,
    MaybeAuthUser(viewer): MaybeAuthUser,
    Path(post_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>> {
    let post = state
        .post_repository
        .find_by_id(post_id, viewer)
        .await?
        .ok_or(AppError::NotFound("Post not found".to_string()))?;

    Ok(Json(json!({ "post": post })))
}

pub async fn like_post(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(post_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>> {
    state
        .post_repository
        .find_by_id(post_id, None)
        .await?
        .ok_or(AppError::NotFound("Post not found".to_string()))?;

    let liked = state.post_repository.toggle_like(post_id, user_id).await?;
    let post = state
        .post_repository
        .find_by_id(post_id, Some(user_id))
        .await?
        .ok_or(AppError::NotFound("Post not found".to_string()))?;

    state.connections.publish(
        Audience::Global,
        ServerEvent::PostLikeUpdated {
            post_id,
            likes_count: post.likes_count,
            liked,
        },
    );

    Ok(Json(json!({
        "message": if liked { "Post liked" } else { "Post unliked" },
        "post": post,
    })))
}

pub async fn add_comment(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(post_id): Path<Uuid>,
    Json(payload): Json<CreateCommentRequest>,
) -> Result<Json<serde_json::Value>> {
    payload.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let content = payload.content.trim();
    if content.is_empty() {
        return Err(AppError::Validation("Comment content is required".to_string()));
    }

    state
        .post_repository
        .find_by_id(post_id, None)
        .await?
        .ok_or(AppError::NotFound("Post not found".to_string()))?;

    let comment = state
        .post_repository
        .add_comment(post_id, user_id, content, payload.is_anonymous.unwrap_or(true))
        .await?;

    state.connections.publish(
        Audience::Global,
        ServerEvent::CommentNew { post_id, comment: comment.clone() },
    );

    Ok(Json(json!({ "message": "Comment added successfully", "comment": comment })))
}

pub async fn delete_post(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(post_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>> {
    let rows_affected = state.post_repository.delete(post_id, user_id).await?;

    if rows_affected == 0 {
        return Err(AppError::NotFound("Post not found or unauthorized".to_string()));
    }

    state.connections.publish(
        Audience::Global,
        ServerEvent::PostDeleted { post_id },
    );

    Ok(Json(json!({ "message": "Post deleted successfully" })))
}

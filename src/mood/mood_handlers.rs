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
    middleware::AuthUser,
    state::AppState,
    websocket::{Audience, ServerEvent},
};

use super::mood_dto::{CreateMoodRequest, MoodFilters, UpdateMoodRequest};

/// Log a mood entry
#[utoipa::path(
    post,
    path = "/api/mood",
    request_body = CreateMoodRequest,
    responses(
        (status = 201, description = "Mood saved"),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "mood",
    security(("bearer_auth" = []))
)]
pub async fn create_mood(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<CreateMoodRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let mood = state
        .mood_repository
        .create(
            user_id,
            payload.mood_level,
            payload.emotion.as_deref().unwrap_or("neutral"),
            payload.note.as_deref(),
            payload.tags.as_deref().unwrap_or(&[]),
        )
        .await?;

    // The dashboard patches its stats tiles from the event payload.
    let stats = state.mood_repository.stats(user_id, None, None).await?;
    state.connections.publish(
        Audience::User(user_id),
        ServerEvent::MoodCreated { mood: mood.clone(), stats },
    );

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Mood saved successfully", "mood": mood })),
    ))
}

/// List mood entries, optionally bounded to a date range
#[utoipa::path(
    get,
    path = "/api/mood",
    params(
        ("start_date" = Option<String>, Query, description = "Range start (RFC 3339)"),
        ("end_date" = Option<String>, Query, description = "Range end (RFC 3339)"),
        ("limit" = Option<i64>, Query, description = "Max entries, default 30")
    ),
    responses(
        (status = 200, description = "List of moods"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "mood",
    security(("bearer_auth" = []))
)]
pub async fn get_moods(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(filters): Query<MoodFilters>,
) -> Result<Json<serde_json::Value>> {
    let moods = state
        .mood_repository
        .find_by_user(
            user_id,
            filters.start_date,
            filters.end_date,
            filters.limit.unwrap_or(30),
        )
        .await?;

    Ok(Json(json!({ "moods": moods })))
}

pub async fn get_mood(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(mood_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>> {
    let mood = state
        .mood_repository
        .find_by_id(mood_id, user_id)
        .await?
        .ok_or(AppError::NotFound("Mood not found".to_string()))?;

    Ok(Json(json!({ "mood": mood })))
}

pub async fn update_mood(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(mood_id): Path<Uuid>,
    Json(payload): Json<UpdateMoodRequest>,
) -> Result<Json<serde_json::Value>> {
    payload.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let mood = state
        .mood_repository
        .update(
            mood_id,
            user_id,
            payload.mood_level,
            payload.emotion.as_deref(),
            payload.note.as_deref(),
            payload.tags.as_deref(),
        )
        .await?
        .ok_or(AppError::NotFound("Mood not found".to_string()))?;

    let stats = state.mood_repository.stats(user_id, None, None).await?;
    state.connections.publish(
        Audience::User(user_id),
        ServerEvent::MoodUpdated { mood: mood.clone(), stats },
    );

    Ok(Json(json!({ "message": "Mood updated successfully", "mood": mood })))
}

pub async fn delete_mood(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(mood_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>> {
    let rows_affected = state.mood_repository.delete(mood_id, user_id).await?;

    if rows_affected == 0 {
        return Err(AppError::NotFound("Mood not found".to_string()));
    }

    let stats = state.mood_repository.stats(user_id, None, None).await?;
    state.connections.publish(
        Audience::User(user_id),
        ServerEvent::MoodDeleted { mood_id, stats },
    );

    Ok(Json(json!({ "message": "Mood deleted successfully" })))
}

/// Aggregate stats over a date range
#[utoipa::path(
    get,
    path = "/api/mood/stats",
    params(
        ("start_date" = Option<String>, Query, description = "Range start (RFC 3339)"),
        ("end_date" = Option<String>, Query, description = "Range end (RFC 3339)")
    ),
    responses(
        (status = 200, description = "Mood stats"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "mood",
    security(("bearer_auth" = []))
)]
pub async fn get_mood_stats(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(filters): Query<MoodFilters>,
) -> Result<Json<serde_json::Value>> {
    let stats = state
        .mood_repository
        .stats(user_id, filters.start_date, filters.end_date)
        .await?;

    Ok(Json(json!({ "stats": stats })))
}

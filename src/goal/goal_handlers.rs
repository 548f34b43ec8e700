use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::{AppError, Result},
    middleware::AuthUser,
    state::AppState,
    websocket::{types::GoalChange, Audience, ServerEvent},
};

use super::goal_dto::{CreateGoalRequest, GoalFilters, UpdateGoalRequest};

pub async fn create_goal(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<CreateGoalRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let goal = state
        .goal_repository
        .create(
            user_id,
            payload.title.trim(),
            payload.description.as_deref(),
            payload.goal_type.as_deref().unwrap_or("daily"),
            payload.target_date,
        )
        .await?;

    state.connections.publish(
        Audience::User(user_id),
        ServerEvent::GoalChanged(GoalChange::updated(goal.clone())),
    );

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Goal created successfully", "goal": goal })),
    ))
}

pub async fn get_goals(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(filters): Query<GoalFilters>,
) -> Result<Json<serde_json::Value>> {
    let goals = state
        .goal_repository
        .find_by_user(user_id, filters.status.as_deref())
        .await?;

    Ok(Json(json!({ "goals": goals })))
}

pub async fn get_goal(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(goal_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>> {
    let goal = state
        .goal_repository
        .find_by_id(goal_id, user_id)
        .await?
        .ok_or(AppError::NotFound("Goal not found".to_string()))?;

    Ok(Json(json!({ "goal": goal })))
}

pub async fn update_goal(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(goal_id): Path<Uuid>,
    Json(payload): Json<UpdateGoalRequest>,
) -> Result<Json<serde_json::Value>> {
    payload.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    // Progress and status imply each other at the completed end of the range.
    let mut status = payload.status.clone();
    let mut progress = payload.progress.map(|p| p.clamp(0, 100));
    let mut completed_at = None;
    if status.as_deref() == Some("completed") {
        progress = Some(100);
        completed_at = Some(Utc::now());
    } else if progress == Some(100) {
        status = Some("completed".to_string());
        completed_at = Some(Utc::now());
    }

    let goal = state
        .goal_repository
        .update(
            goal_id,
            user_id,
            payload.title.as_deref().map(str::trim),
            payload.description.as_deref(),
            payload.goal_type.as_deref(),
            status.as_deref(),
            progress,
            payload.target_date,
            completed_at,
        )
        .await?
        .ok_or(AppError::NotFound("Goal not found".to_string()))?;

    state.connections.publish(
        Audience::User(user_id),
        ServerEvent::GoalChanged(GoalChange::updated(goal.clone())),
    );

    Ok(Json(json!({ "message": "Goal updated successfully", "goal": goal })))
}

pub async fn delete_goal(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(goal_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>> {
    let rows_affected = state.goal_repository.delete(goal_id, user_id).await?;

    if rows_affected == 0 {
        return Err(AppError::NotFound("Goal not found".to_string()));
    }

    state.connections.publish(
        Audience::User(user_id),
        ServerEvent::GoalChanged(GoalChange::deleted(goal_id)),
    );

    Ok(Json(json!({ "message": "Goal deleted successfully" })))
}

use axum::{extract::State, Json};
use serde_json::json;

use crate::{
    error::{AppError, Result},
    middleware::AuthUser,
    state::AppState,
};

use super::{
    user_dto::{UpdatePreferencesRequest, UpdateProfileRequest},
    user_models::UserResponse,
};

pub async fn get_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<serde_json::Value>> {
    let user = state
        .user_repository
        .find_by_id(user_id)
        .await?
        .ok_or(AppError::NotFound("User not found".to_string()))?;

    let response: UserResponse = user.into();
    Ok(Json(json!({ "user": response })))
}

pub async fn update_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Json<serde_json::Value>> {
    let user = state
        .user_repository
        .update_profile(
            user_id,
            payload.first_name.as_deref(),
            payload.last_name.as_deref(),
        )
        .await?
        .ok_or(AppError::NotFound("User not found".to_string()))?;

    let response: UserResponse = user.into();
    Ok(Json(json!({ "message": "Profile updated successfully", "user": response })))
}

pub async fn update_preferences(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<UpdatePreferencesRequest>,
) -> Result<Json<serde_json::Value>> {
    let user = state
        .user_repository
        .update_preferences(
            user_id,
            payload.theme.as_deref(),
            payload.high_contrast,
            payload.text_to_speech,
            payload.notifications,
        )
        .await?
        .ok_or(AppError::NotFound("User not found".to_string()))?;

    let response: UserResponse = user.into();
    Ok(Json(json!({
        "message": "Preferences updated successfully",
        "preferences": response.preferences,
    })))
}

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::Utc;
use validator::Validate;

use crate::{
    auth::{create_token, hash_password, verify_password},
    error::{AppError, Result},
    middleware::AuthUser,
    state::AppState,
};

use super::auth_dto::{AuthResponse, LoginRequest, RegisterRequest};

/// Register a new user
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered successfully", body = AuthResponse),
        (status = 400, description = "Validation error or duplicate email/username")
    ),
    tag = "auth"
)]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    if let Some(existing) = state
        .user_repository
        .find_by_email_or_username(&payload.email, &payload.username)
        .await?
    {
        let message = if existing.email == payload.email.to_lowercase() {
            "Email already exists"
        } else {
            "Username already exists"
        };
        return Err(AppError::BadRequest(message.to_string()));
    }

    let password_hash = hash_password(&payload.password)?;
    let user = state
        .user_repository
        .create(
            &payload.username,
            &payload.email,
            &password_hash,
            payload.first_name.as_deref(),
            payload.last_name.as_deref(),
        )
        .await
        .map_err(|e| {
            if let AppError::Database(ref db_err) = e {
                if db_err.to_string().contains("duplicate key") {
                    return AppError::BadRequest("Email or username already exists".to_string());
                }
            }
            e
        })?;

    let token = create_token(user.id, &state.config.jwt_secret, state.config.jwt_expiration_days)?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            message: "User created successfully".to_string(),
            token,
            user: user.into(),
        }),
    ))
}

/// Login with email and password
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>> {
    payload.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let user = state
        .user_repository
        .find_by_email(&payload.email)
        .await?
        .ok_or(AppError::Unauthorized("Invalid credentials".to_string()))?;

    if !verify_password(&payload.password, &user.password)? {
        return Err(AppError::Unauthorized("Invalid credentials".to_string()));
    }

    state.user_repository.update_last_login(user.id, Utc::now()).await?;

    let token = create_token(user.id, &state.config.jwt_secret, state.config.jwt_expiration_days)?;

    Ok(Json(AuthResponse {
        message: "Login successful".to_string(),
        token,
        user: user.into(),
    }))
}

pub async fn logout() -> impl IntoResponse {
    // Tokens are stateless; the client discards its copy.
    Json(serde_json::json!({ "message": "Logout successful" }))
}

pub async fn me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<serde_json::Value>> {
    let user = state
        .user_repository
        .find_by_id(user_id)
        .await?
        .ok_or(AppError::NotFound("User not found".to_string()))?;

    let response: crate::user::user_models::UserResponse = user.into();
    Ok(Json(serde_json::json!({ "user": response })))
}

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

use super::{
    reminder_dto::{validate_days, validate_kind, CreateReminderRequest, ReminderFilters, UpdateReminderRequest},
    reminder_models::{parse_time_of_day, Reminder},
};

/// Create a reminder
#[utoipa::path(
    post,
    path = "/api/reminders",
    request_body = CreateReminderRequest,
    responses(
        (status = 201, description = "Reminder created", body = Reminder),
        (status = 400, description = "Missing title/time, unknown type or empty days"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "reminders",
    security(("bearer_auth" = []))
)]
pub async fn create_reminder(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<CreateReminderRequest>,
) -> Result<impl IntoResponse> {
    let (Some(kind), Some(title), Some(raw_time)) =
        (payload.kind.as_deref(), payload.title.as_deref(), payload.time.as_deref())
    else {
        return Err(AppError::Validation(
            "Type, title, and time are required".to_string(),
        ));
    };
    let title = title.trim();
    if title.is_empty() {
        return Err(AppError::Validation(
            "Type, title, and time are required".to_string(),
        ));
    }
    validate_kind(kind)?;
    validate_days(&payload.days)?;
    let time = parse_time_of_day(raw_time).map_err(AppError::Validation)?;

    let reminder = state
        .reminder_repository
        .create(
            user_id,
            kind,
            title,
            payload.description.as_deref(),
            time,
            &payload.days,
        )
        .await?;

    state.connections.publish(
        Audience::User(user_id),
        ServerEvent::ReminderCreated { reminder: reminder.clone() },
    );

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Reminder created successfully", "reminder": reminder })),
    ))
}

/// List the authenticated user's reminders
#[utoipa::path(
    get,
    path = "/api/reminders",
    params(
        ("is_active" = Option<bool>, Query, description = "Filter by active flag")
    ),
    responses(
        (status = 200, description = "List of reminders, each with its days array"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "reminders",
    security(("bearer_auth" = []))
)]
pub async fn get_reminders(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(filters): Query<ReminderFilters>,
) -> Result<Json<serde_json::Value>> {
    let reminders = state
        .reminder_repository
        .find_by_user(user_id, filters.is_active)
        .await?;

    Ok(Json(json!({ "reminders": reminders })))
}

pub async fn get_reminder(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(reminder_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>> {
    let reminder = state
        .reminder_repository
        .find_by_id(reminder_id, user_id)
        .await?
        .ok_or(AppError::NotFound("Reminder not found".to_string()))?;

    Ok(Json(json!({ "reminder": reminder })))
}

/// Partially update a reminder
#[utoipa::path(
    put,
    path = "/api/reminders/{id}",
    request_body = UpdateReminderRequest,
    params(("id" = Uuid, Path, description = "Reminder id")),
    responses(
        (status = 200, description = "Updated reminder", body = Reminder),
        (status = 404, description = "Reminder not found or not owned")
    ),
    tag = "reminders",
    security(("bearer_auth" = []))
)]
pub async fn update_reminder(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(reminder_id): Path<Uuid>,
    Json(payload): Json<UpdateReminderRequest>,
) -> Result<Json<serde_json::Value>> {
    payload.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;
    if let Some(ref kind) = payload.kind {
        validate_kind(kind)?;
    }
    if let Some(ref days) = payload.days {
        validate_days(days)?;
    }
    let time = match payload.time.as_deref() {
        Some(raw) => Some(parse_time_of_day(raw).map_err(AppError::Validation)?),
        None => None,
    };

    let reminder = state
        .reminder_repository
        .update(
            reminder_id,
            user_id,
            payload.kind.as_deref(),
            payload.title.as_deref().map(str::trim),
            payload.description.as_deref(),
            time,
            payload.is_active,
            payload.days.as_deref(),
        )
        .await?
        .ok_or(AppError::NotFound("Reminder not found".to_string()))?;

    state.connections.publish(
        Audience::User(user_id),
        ServerEvent::ReminderUpdated { reminder: reminder.clone() },
    );

    Ok(Json(json!({ "message": "Reminder updated successfully", "reminder": reminder })))
}

/// Delete a reminder and its weekday associations
#[utoipa::path(
    delete,
    path = "/api/reminders/{id}",
    params(("id" = Uuid, Path, description = "Reminder id")),
    responses(
        (status = 200, description = "Reminder deleted"),
        (status = 404, description = "Reminder not found or not owned")
    ),
    tag = "reminders",
    security(("bearer_auth" = []))
)]
pub async fn delete_reminder(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(reminder_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>> {
    let rows_affected = state
        .reminder_repository
        .delete(reminder_id, user_id)
        .await?;

    if rows_affected == 0 {
        return Err(AppError::NotFound("Reminder not found".to_string()));
    }

    state.connections.publish(
        Audience::User(user_id),
        ServerEvent::ReminderDeleted { reminder_id },
    );

    Ok(Json(json!({ "message": "Reminder deleted successfully" })))
}

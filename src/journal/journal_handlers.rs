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

use super::journal_dto::{CreateJournalRequest, JournalFilters, UpdateJournalRequest};

pub async fn create_journal(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<CreateJournalRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let journal = state
        .journal_repository
        .create(
            user_id,
            payload.title.as_deref(),
            &payload.content,
            payload.mood.as_deref(),
            payload.tags.as_deref().unwrap_or(&[]),
        )
        .await?;

    state.connections.publish(
        Audience::User(user_id),
        ServerEvent::JournalCreated { journal: journal.clone() },
    );

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Journal entry created successfully", "journal": journal })),
    ))
}

pub async fn get_journals(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(filters): Query<JournalFilters>,
) -> Result<Json<serde_json::Value>> {
    let page = filters.page.unwrap_or(1);
    let limit = filters.limit.unwrap_or(10);

    let journals = state
        .journal_repository
        .find_by_user(user_id, filters.search.as_deref(), page, limit)
        .await?;
    let total = state
        .journal_repository
        .count(user_id, filters.search.as_deref())
        .await?;

    let total_pages = (total as f64 / limit as f64).ceil() as i64;

    Ok(Json(json!({
        "journals": journals,
        "total": total,
        "current_page": page,
        "total_pages": total_pages,
    })))
}

pub async fn get_journal(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(journal_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>> {
    let journal = state
        .journal_repository
        .find_by_id(journal_id, user_id)
        .await?
        .ok_or(AppError::NotFound("Journal entry not found".to_string()))?;

    Ok(Json(json!({ "journal": journal })))
}

pub async fn update_journal(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(journal_id): Path<Uuid>,
    Json(payload): Json<UpdateJournalRequest>,
) -> Result<Json<serde_json::Value>> {
    payload.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let journal = state
        .journal_repository
        .update(
            journal_id,
            user_id,
            payload.title.as_deref(),
            payload.content.as_deref(),
            payload.mood.as_deref(),
            payload.tags.as_deref(),
        )
        .await?
        .ok_or(AppError::NotFound("Journal entry not found".to_string()))?;

    state.connections.publish(
        Audience::User(user_id),
        ServerEvent::JournalUpdated { journal: journal.clone() },
    );

    Ok(Json(json!({ "message": "Journal entry updated successfully", "journal": journal })))
}

pub async fn delete_journal(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(journal_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>> {
    let rows_affected = state
        .journal_repository
        .delete(journal_id, user_id)
        .await?;

    if rows_affected == 0 {
        return Err(AppError::NotFound("Journal entry not found".to_string()));
    }

    state.connections.publish(
        Audience::User(user_id),
        ServerEvent::JournalDeleted { journal_id },
    );

    Ok(Json(json!({ "message": "Journal entry deleted successfully" })))
}

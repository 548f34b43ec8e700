use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::collections::HashMap;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Mood {
    pub id: Uuid,
    pub user_id: Uuid,
    pub mood_level: i16,
    pub emotion: String,
    pub note: Option<String>,
    pub date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    #[sqlx(skip)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MoodStats {
    pub total: i64,
    pub average: f64,
    pub emotions: HashMap<String, i64>,
}

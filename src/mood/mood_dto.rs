use chrono::{DateTime, Utc};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateMoodRequest {
    #[validate(range(min = 1, max = 10, message = "Mood level must be between 1 and 10"))]
    pub mood_level: i16,
    pub emotion: Option<String>,
    pub note: Option<String>,
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateMoodRequest {
    #[validate(range(min = 1, max = 10, message = "Mood level must be between 1 and 10"))]
    pub mood_level: Option<i16>,
    pub emotion: Option<String>,
    pub note: Option<String>,
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub struct MoodFilters {
    #[serde(alias = "startDate")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(alias = "endDate")]
    pub end_date: Option<DateTime<Utc>>,
    pub limit: Option<i64>,
}

use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateJournalRequest {
    pub title: Option<String>,
    #[validate(length(min = 1, message = "Journal content is required"))]
    pub content: String,
    pub mood: Option<String>,
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateJournalRequest {
    pub title: Option<String>,
    #[validate(length(min = 1, message = "Journal content must not be empty"))]
    pub content: Option<String>,
    pub mood: Option<String>,
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub struct JournalFilters {
    pub search: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

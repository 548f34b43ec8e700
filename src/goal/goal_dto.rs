use chrono::{DateTime, Utc};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateGoalRequest {
    #[validate(length(min = 1, max = 255, message = "Goal title is required"))]
    pub title: String,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub goal_type: Option<String>,
    #[serde(alias = "targetDate")]
    pub target_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateGoalRequest {
    #[validate(length(min = 1, max = 255, message = "Goal title must not be empty"))]
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub goal_type: Option<String>,
    pub status: Option<String>,
    #[validate(range(min = 0, max = 100, message = "Progress must be between 0 and 100"))]
    pub progress: Option<i16>,
    #[serde(alias = "targetDate")]
    pub target_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct GoalFilters {
    pub status: Option<String>,
}

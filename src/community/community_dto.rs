use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreatePostRequest {
    #[validate(length(min = 1, max = 1000, message = "Post content must be between 1 and 1000 characters"))]
    pub content: String,
    #[serde(alias = "isAnonymous")]
    pub is_anonymous: Option<bool>,
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCommentRequest {
    #[validate(length(min = 1, max = 500, message = "Comment must be between 1 and 500 characters"))]
    pub content: String,
    #[serde(alias = "isAnonymous")]
    pub is_anonymous: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct PostFilters {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub filter: Option<String>,
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

pub const ANONYMOUS_AUTHOR: &str = "Anonymous User";

/// Post row joined with the author's username; `author` is the display name
/// (the real username is hidden on anonymous posts).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Post {
    pub id: Uuid,
    pub user_id: Uuid,
    pub content: String,
    pub is_anonymous: bool,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing)]
    #[serde(default)]
    pub author_username: String,
    #[sqlx(skip)]
    pub author: String,
    #[sqlx(skip)]
    pub likes_count: i64,
    /// Whether the requesting user has liked this post; always false for
    /// anonymous requests.
    #[sqlx(skip)]
    pub is_liked: bool,
    #[sqlx(skip)]
    pub comments: Vec<PostComment>,
    #[sqlx(skip)]
    pub tags: Vec<String>,
}

impl Post {
    pub fn display_author(&self) -> String {
        if self.is_anonymous {
            ANONYMOUS_AUTHOR.to_string()
        } else {
            self.author_username.clone()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct PostComment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub user_id: Uuid,
    pub content: String,
    pub is_anonymous: bool,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing)]
    #[serde(default)]
    pub author_username: String,
    #[sqlx(skip)]
    pub author: String,
}

impl PostComment {
    pub fn display_author(&self) -> String {
        if self.is_anonymous {
            ANONYMOUS_AUTHOR.to_string()
        } else {
            self.author_username.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(is_anonymous: bool) -> Post {
        Post {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            content: "hello".to_string(),
            is_anonymous,
            created_at: Utc::now(),
            author_username: "sam".to_string(),
            author: String::new(),
            likes_count: 0,
            is_liked: false,
            comments: Vec::new(),
            tags: Vec::new(),
        }
    }

    #[test]
    fn test_anonymous_posts_hide_username() {
        assert_eq!(post(true).display_author(), ANONYMOUS_AUTHOR);
        assert_eq!(post(false).display_author(), "sam");
    }
}

use sqlx::PgPool;
use uuid::Uuid;

use crate::error::Result;

use super::post_models::{Post, PostComment};

#[derive(Clone)]
pub struct PostRepository {
    pool: PgPool,
}

impl PostRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Fill in likes, comments, tags and the display author. `viewer` drives
    /// the per-user `is_liked` annotation; it stays false for anonymous
    /// requests.
    async fn decorate(&self, post: &mut Post, viewer: Option<Uuid>) -> Result<()> {
        post.likes_count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM post_likes WHERE post_id = $1",
        )
        .bind(post.id)
        .fetch_one(&self.pool)
        .await?;

        post.is_liked = match viewer {
            Some(user_id) => sqlx::query_scalar::<_, bool>(
                "SELECT EXISTS(SELECT 1 FROM post_likes WHERE post_id = $1 AND user_id = $2)",
            )
            .bind(post.id)
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?,
            None => false,
        };

        let mut comments = sqlx::query_as::<_, PostComment>(
            "SELECT c.*, u.username AS author_username
             FROM post_comments c
             INNER JOIN users u ON u.id = c.user_id
             WHERE c.post_id = $1
             ORDER BY c.created_at ASC",
        )
        .bind(post.id)
        .fetch_all(&self.pool)
        .await?;
        for comment in &mut comments {
            comment.author = comment.display_author();
        }
        post.comments = comments;

        post.tags = sqlx::query_scalar::<_, String>(
            "SELECT tag FROM post_tags WHERE post_id = $1",
        )
        .bind(post.id)
        .fetch_all(&self.pool)
        .await?;

        post.author = post.display_author();
        Ok(())
    }

    pub async fn create(
        &self,
        user_id: Uuid,
        content: &str,
        is_anonymous: bool,
        tags: &[String],
    ) -> Result<Post> {
        let mut tx = self.pool.begin().await?;

        let post_id: Uuid = sqlx::query_scalar(
            "INSERT INTO posts (user_id, content, is_anonymous)
             VALUES ($1, $2, $3)
             RETURNING id",
        )
        .bind(user_id)
        .bind(content)
        .bind(is_anonymous)
        .fetch_one(&mut *tx)
        .await?;

        for tag in tags {
            sqlx::query(
                "INSERT INTO post_tags (post_id, tag) VALUES ($1, $2) ON CONFLICT DO NOTHING",
            )
            .bind(post_id)
            .bind(tag)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        let post = self.find_by_id(post_id, Some(user_id)).await?;
        post.ok_or(sqlx::Error::RowNotFound.into())
    }

    pub async fn find_by_id(&self, id: Uuid, viewer: Option<Uuid>) -> Result<Option<Post>> {
        let post = sqlx::query_as::<_, Post>(
            "SELECT p.*, u.username AS author_username
             FROM posts p
             INNER JOIN users u ON u.id = p.user_id
             WHERE p.id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match post {
            Some(mut post) => {
                self.decorate(&mut post, viewer).await?;
                Ok(Some(post))
            }
            None => Ok(None),
        }
    }

    pub async fn find_all(
        &self,
        author: Option<Uuid>,
        viewer: Option<Uuid>,
        limit: i64,
    ) -> Result<Vec<Post>> {
        let mut posts = sqlx::query_as::<_, Post>(
            "SELECT p.*, u.username AS author_username
             FROM posts p
             INNER JOIN users u ON u.id = p.user_id
             WHERE ($1::uuid IS NULL OR p.user_id = $1)
             ORDER BY p.created_at DESC
             LIMIT $2",
        )
        .bind(author)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        for post in &mut posts {
            self.decorate(post, viewer).await?;
        }

        Ok(posts)
    }

    /// Returns true when the toggle ends in the liked state.
    pub async fn toggle_like(&self, post_id: Uuid, user_id: Uuid) -> Result<bool> {
        let removed = sqlx::query(
            "DELETE FROM post_likes WHERE post_id = $1 AND user_id = $2",
        )
        .bind(post_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        if removed.rows_affected() > 0 {
            return Ok(false);
        }

        sqlx::query(
            "INSERT INTO post_likes (post_id, user_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(post_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        Ok(true)
    }

    pub async fn add_comment(
        &self,
        post_id: Uuid,
        user_id: Uuid,
        content: &str,
        is_anonymous: bool,
    ) -> Result<PostComment> {
        let comment_id: Uuid = sqlx::query_scalar(
            "INSERT INTO post_comments (post_id, user_id, content, is_anonymous)
             VALUES ($1, $2, $3, $4)
             RETURNING id",
        )
        .bind(post_id)
        .bind(user_id)
        .bind(content)
        .bind(is_anonymous)
        .fetch_one(&self.pool)
        .await?;

        let mut comment = sqlx::query_as::<_, PostComment>(
            "SELECT c.*, u.username AS author_username
             FROM post_comments c
             INNER JOIN users u ON u.id = c.user_id
             WHERE c.id = $1",
        )
        .bind(comment_id)
        .fetch_one(&self.pool)
        .await?;
        comment.author = comment.display_author();
        Ok(comment)
    }

    pub async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<u64> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

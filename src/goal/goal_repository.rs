use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::Result;

use super::goal_models::Goal;

#[derive(Clone)]
pub struct GoalRepository {
    pool: PgPool,
}

impl GoalRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        user_id: Uuid,
        title: &str,
        description: Option<&str>,
        goal_type: &str,
        target_date: Option<DateTime<Utc>>,
    ) -> Result<Goal> {
        let goal = sqlx::query_as::<_, Goal>(
            "INSERT INTO goals (user_id, title, description, goal_type, target_date)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING *",
        )
        .bind(user_id)
        .bind(title)
        .bind(description)
        .bind(goal_type)
        .bind(target_date)
        .fetch_one(&self.pool)
        .await?;
        Ok(goal)
    }

    pub async fn find_by_user(&self, user_id: Uuid, status: Option<&str>) -> Result<Vec<Goal>> {
        let goals = sqlx::query_as::<_, Goal>(
            "SELECT * FROM goals
             WHERE user_id = $1 AND ($2::text IS NULL OR status = $2)
             ORDER BY created_at DESC",
        )
        .bind(user_id)
        .bind(status)
        .fetch_all(&self.pool)
        .await?;
        Ok(goals)
    }

    pub async fn find_by_id(&self, id: Uuid, user_id: Uuid) -> Result<Option<Goal>> {
        let goal = sqlx::query_as::<_, Goal>(
            "SELECT * FROM goals WHERE id = $1 AND user_id = $2",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(goal)
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn update(
        &self,
        id: Uuid,
        user_id: Uuid,
        title: Option<&str>,
        description: Option<&str>,
        goal_type: Option<&str>,
        status: Option<&str>,
        progress: Option<i16>,
        target_date: Option<DateTime<Utc>>,
        completed_at: Option<DateTime<Utc>>,
    ) -> Result<Option<Goal>> {
        let goal = sqlx::query_as::<_, Goal>(
            "UPDATE goals SET
                title = COALESCE($1, title),
                description = COALESCE($2, description),
                goal_type = COALESCE($3, goal_type),
                status = COALESCE($4, status),
                progress = COALESCE($5, progress),
                target_date = COALESCE($6, target_date),
                completed_at = COALESCE($7, completed_at)
             WHERE id = $8 AND user_id = $9
             RETURNING *",
        )
        .bind(title)
        .bind(description)
        .bind(goal_type)
        .bind(status)
        .bind(progress)
        .bind(target_date)
        .bind(completed_at)
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(goal)
    }

    pub async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<u64> {
        let result = sqlx::query("DELETE FROM goals WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::collections::HashMap;
use uuid::Uuid;

use crate::error::Result;

use super::mood_models::{Mood, MoodStats};

#[derive(Clone)]
pub struct MoodRepository {
    pool: PgPool,
}

impl MoodRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn load_tags(&self, mood: &mut Mood) -> Result<()> {
        mood.tags = sqlx::query_scalar::<_, String>(
            "SELECT tag FROM mood_tags WHERE mood_id = $1",
        )
        .bind(mood.id)
        .fetch_all(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn create(
        &self,
        user_id: Uuid,
        mood_level: i16,
        emotion: &str,
        note: Option<&str>,
        tags: &[String],
    ) -> Result<Mood> {
        let mut tx = self.pool.begin().await?;

        let mut mood = sqlx::query_as::<_, Mood>(
            "INSERT INTO moods (user_id, mood_level, emotion, note)
             VALUES ($1, $2, $3, $4)
             RETURNING *",
        )
        .bind(user_id)
        .bind(mood_level)
        .bind(emotion)
        .bind(note)
        .fetch_one(&mut *tx)
        .await?;

        for tag in tags {
            sqlx::query(
                "INSERT INTO mood_tags (mood_id, tag) VALUES ($1, $2) ON CONFLICT DO NOTHING",
            )
            .bind(mood.id)
            .bind(tag)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        self.load_tags(&mut mood).await?;
        Ok(mood)
    }

    pub async fn find_by_user(
        &self,
        user_id: Uuid,
        start_date: Option<DateTime<Utc>>,
        end_date: Option<DateTime<Utc>>,
        limit: i64,
    ) -> Result<Vec<Mood>> {
        let mut moods = sqlx::query_as::<_, Mood>(
            "SELECT * FROM moods
             WHERE user_id = $1
               AND ($2::timestamptz IS NULL OR date >= $2)
               AND ($3::timestamptz IS NULL OR date <= $3)
             ORDER BY date DESC
             LIMIT $4",
        )
        .bind(user_id)
        .bind(start_date)
        .bind(end_date)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        for mood in &mut moods {
            self.load_tags(mood).await?;
        }

        Ok(moods)
    }

    pub async fn find_by_id(&self, id: Uuid, user_id: Uuid) -> Result<Option<Mood>> {
        let mood = sqlx::query_as::<_, Mood>(
            "SELECT * FROM moods WHERE id = $1 AND user_id = $2",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        match mood {
            Some(mut mood) => {
                self.load_tags(&mut mood).await?;
                Ok(Some(mood))
            }
            None => Ok(None),
        }
    }

    pub async fn update(
        &self,
        id: Uuid,
        user_id: Uuid,
        mood_level: Option<i16>,
        emotion: Option<&str>,
        note: Option<&str>,
        tags: Option<&[String]>,
    ) -> Result<Option<Mood>> {
        let mood = sqlx::query_as::<_, Mood>(
            "UPDATE moods SET
                mood_level = COALESCE($1, mood_level),
                emotion = COALESCE($2, emotion),
                note = COALESCE($3, note)
             WHERE id = $4 AND user_id = $5
             RETURNING *",
        )
        .bind(mood_level)
        .bind(emotion)
        .bind(note)
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(mut mood) = mood else {
            return Ok(None);
        };

        if let Some(tags) = tags {
            let mut tx = self.pool.begin().await?;
            sqlx::query("DELETE FROM mood_tags WHERE mood_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            for tag in tags {
                sqlx::query(
                    "INSERT INTO mood_tags (mood_id, tag) VALUES ($1, $2) ON CONFLICT DO NOTHING",
                )
                .bind(id)
                .bind(tag)
                .execute(&mut *tx)
                .await?;
            }
            tx.commit().await?;
        }

        self.load_tags(&mut mood).await?;
        Ok(Some(mood))
    }

    pub async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<u64> {
        let result = sqlx::query("DELETE FROM moods WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    pub async fn stats(
        &self,
        user_id: Uuid,
        start_date: Option<DateTime<Utc>>,
        end_date: Option<DateTime<Utc>>,
    ) -> Result<MoodStats> {
        let (total, average): (i64, f64) = sqlx::query_as(
            "SELECT COUNT(*), COALESCE(AVG(mood_level), 0)::double precision
             FROM moods
             WHERE user_id = $1
               AND ($2::timestamptz IS NULL OR date >= $2)
               AND ($3::timestamptz IS NULL OR date <= $3)",
        )
        .bind(user_id)
        .bind(start_date)
        .bind(end_date)
        .fetch_one(&self.pool)
        .await?;

        let emotions: Vec<(String, i64)> = sqlx::query_as(
            "SELECT emotion, COUNT(*)
             FROM moods
             WHERE user_id = $1
               AND ($2::timestamptz IS NULL OR date >= $2)
               AND ($3::timestamptz IS NULL OR date <= $3)
             GROUP BY emotion",
        )
        .bind(user_id)
        .bind(start_date)
        .bind(end_date)
        .fetch_all(&self.pool)
        .await?;

        Ok(MoodStats {
            total,
            average: (average * 100.0).round() / 100.0,
            emotions: emotions.into_iter().collect::<HashMap<_, _>>(),
        })
    }
}

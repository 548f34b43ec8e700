use sqlx::PgPool;
use uuid::Uuid;

use crate::error::Result;

use super::journal_models::Journal;

#[derive(Clone)]
pub struct JournalRepository {
    pool: PgPool,
}

impl JournalRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn load_tags(&self, journal: &mut Journal) -> Result<()> {
        journal.tags = sqlx::query_scalar::<_, String>(
            "SELECT tag FROM journal_tags WHERE journal_id = $1",
        )
        .bind(journal.id)
        .fetch_all(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn create(
        &self,
        user_id: Uuid,
        title: Option<&str>,
        content: &str,
        mood: Option<&str>,
        tags: &[String],
    ) -> Result<Journal> {
        let mut tx = self.pool.begin().await?;

        let mut journal = sqlx::query_as::<_, Journal>(
            "INSERT INTO journals (user_id, title, content, mood)
             VALUES ($1, $2, $3, $4)
             RETURNING *",
        )
        .bind(user_id)
        .bind(title)
        .bind(content)
        .bind(mood)
        .fetch_one(&mut *tx)
        .await?;

        for tag in tags {
            sqlx::query(
                "INSERT INTO journal_tags (journal_id, tag) VALUES ($1, $2) ON CONFLICT DO NOTHING",
            )
            .bind(journal.id)
            .bind(tag)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        self.load_tags(&mut journal).await?;
        Ok(journal)
    }

    pub async fn find_by_user(
        &self,
        user_id: Uuid,
        search: Option<&str>,
        page: i64,
        limit: i64,
    ) -> Result<Vec<Journal>> {
        let pattern = search.map(|s| format!("%{}%", s));
        let offset = (page.max(1) - 1) * limit;

        let mut journals = sqlx::query_as::<_, Journal>(
            "SELECT * FROM journals
             WHERE user_id = $1
               AND ($2::text IS NULL OR title ILIKE $2 OR content ILIKE $2)
             ORDER BY created_at DESC
             LIMIT $3 OFFSET $4",
        )
        .bind(user_id)
        .bind(pattern)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        for journal in &mut journals {
            self.load_tags(journal).await?;
        }

        Ok(journals)
    }

    pub async fn count(&self, user_id: Uuid, search: Option<&str>) -> Result<i64> {
        let pattern = search.map(|s| format!("%{}%", s));
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM journals
             WHERE user_id = $1
               AND ($2::text IS NULL OR title ILIKE $2 OR content ILIKE $2)",
        )
        .bind(user_id)
        .bind(pattern)
        .fetch_one(&self.pool)
        .await?;
        Ok(total)
    }

    pub async fn find_by_id(&self, id: Uuid, user_id: Uuid) -> Result<Option<Journal>> {
        let journal = sqlx::query_as::<_, Journal>(
            "SELECT * FROM journals WHERE id = $1 AND user_id = $2",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        match journal {
            Some(mut journal) => {
                self.load_tags(&mut journal).await?;
                Ok(Some(journal))
            }
            None => Ok(None),
        }
    }

    pub async fn update(
        &self,
        id: Uuid,
        user_id: Uuid,
        title: Option<&str>,
        content: Option<&str>,
        mood: Option<&str>,
        tags: Option<&[String]>,
    ) -> Result<Option<Journal>> {
        let journal = sqlx::query_as::<_, Journal>(
            "UPDATE journals SET
                title = COALESCE($1, title),
                content = COALESCE($2, content),
                mood = COALESCE($3, mood),
                updated_at = NOW()
             WHERE id = $4 AND user_id = $5
             RETURNING *",
        )
        .bind(title)
        .bind(content)
        .bind(mood)
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(mut journal) = journal else {
            return Ok(None);
        };

        if let Some(tags) = tags {
            let mut tx = self.pool.begin().await?;
            sqlx::query("DELETE FROM journal_tags WHERE journal_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            for tag in tags {
                sqlx::query(
                    "INSERT INTO journal_tags (journal_id, tag) VALUES ($1, $2) ON CONFLICT DO NOTHING",
                )
                .bind(id)
                .bind(tag)
                .execute(&mut *tx)
                .await?;
            }
            tx.commit().await?;
        }

        self.load_tags(&mut journal).await?;
        Ok(Some(journal))
    }

    pub async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<u64> {
        let result = sqlx::query("DELETE FROM journals WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

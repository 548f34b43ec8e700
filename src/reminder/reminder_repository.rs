use chrono::{DateTime, NaiveTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::Result;

use super::reminder_models::{DueReminder, Reminder};

#[derive(Clone)]
pub struct ReminderRepository {
    pool: PgPool,
}

impl ReminderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn load_days(&self, reminder: &mut Reminder) -> Result<()> {
        reminder.days = sqlx::query_scalar::<_, i16>(
            "SELECT day FROM reminder_days WHERE reminder_id = $1 ORDER BY day",
        )
        .bind(reminder.id)
        .fetch_all(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn create(
        &self,
        user_id: Uuid,
        kind: &str,
        title: &str,
        description: Option<&str>,
        time: NaiveTime,
        days: &[i16],
    ) -> Result<Reminder> {
        let mut tx = self.pool.begin().await?;

        let mut reminder = sqlx::query_as::<_, Reminder>(
            "INSERT INTO reminders (user_id, kind, title, description, time)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING *",
        )
        .bind(user_id)
        .bind(kind)
        .bind(title)
        .bind(description)
        .bind(time)
        .fetch_one(&mut *tx)
        .await?;

        for day in days {
            sqlx::query(
                "INSERT INTO reminder_days (reminder_id, day) VALUES ($1, $2)
                 ON CONFLICT DO NOTHING",
            )
            .bind(reminder.id)
            .bind(day)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        self.load_days(&mut reminder).await?;
        Ok(reminder)
    }

    pub async fn find_by_user(
        &self,
        user_id: Uuid,
        is_active: Option<bool>,
    ) -> Result<Vec<Reminder>> {
        let mut reminders = sqlx::query_as::<_, Reminder>(
            "SELECT * FROM reminders
             WHERE user_id = $1 AND ($2::boolean IS NULL OR is_active = $2)
             ORDER BY created_at DESC",
        )
        .bind(user_id)
        .bind(is_active)
        .fetch_all(&self.pool)
        .await?;

        for reminder in &mut reminders {
            self.load_days(reminder).await?;
        }

        Ok(reminders)
    }

    pub async fn find_by_id(&self, id: Uuid, user_id: Uuid) -> Result<Option<Reminder>> {
        let reminder = sqlx::query_as::<_, Reminder>(
            "SELECT * FROM reminders WHERE id = $1 AND user_id = $2",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        match reminder {
            Some(mut reminder) => {
                self.load_days(&mut reminder).await?;
                Ok(Some(reminder))
            }
            None => Ok(None),
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn update(
        &self,
        id: Uuid,
        user_id: Uuid,
        kind: Option<&str>,
        title: Option<&str>,
        description: Option<&str>,
        time: Option<NaiveTime>,
        is_active: Option<bool>,
        days: Option<&[i16]>,
    ) -> Result<Option<Reminder>> {
        let reminder = sqlx::query_as::<_, Reminder>(
            "UPDATE reminders SET
                kind = COALESCE($1, kind),
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                time = COALESCE($4, time),
                is_active = COALESCE($5, is_active)
             WHERE id = $6 AND user_id = $7
             RETURNING *",
        )
        .bind(kind)
        .bind(title)
        .bind(description)
        .bind(time)
        .bind(is_active)
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(mut reminder) = reminder else {
            return Ok(None);
        };

        if let Some(days) = days {
            let mut tx = self.pool.begin().await?;
            sqlx::query("DELETE FROM reminder_days WHERE reminder_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            for day in days {
                sqlx::query(
                    "INSERT INTO reminder_days (reminder_id, day) VALUES ($1, $2)
                     ON CONFLICT DO NOTHING",
                )
                .bind(id)
                .bind(day)
                .execute(&mut *tx)
                .await?;
            }
            tx.commit().await?;
        }

        self.load_days(&mut reminder).await?;
        Ok(Some(reminder))
    }

    /// Weekday rows go with the reminder (FK cascade).
    pub async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<u64> {
        let result = sqlx::query("DELETE FROM reminders WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Scan for reminders due at the given minute: active, time-of-day equal,
    /// weekday in the reminder's day set, and not already fired today.
    pub async fn find_due(
        &self,
        minute: NaiveTime,
        weekday: i16,
        now: DateTime<Utc>,
    ) -> Result<Vec<DueReminder>> {
        let due = sqlx::query_as::<_, DueReminder>(
            "SELECT r.id, r.user_id, r.kind, r.title, r.description, r.time,
                    u.notifications AS user_notifications
             FROM reminders r
             INNER JOIN users u ON u.id = r.user_id
             WHERE r.is_active = TRUE
               AND r.time = $1
               AND EXISTS (
                   SELECT 1 FROM reminder_days rd
                   WHERE rd.reminder_id = r.id AND rd.day = $2
               )
               AND (r.last_triggered IS NULL OR r.last_triggered::date != $3::date)",
        )
        .bind(minute)
        .bind(weekday)
        .bind(now)
        .fetch_all(&self.pool)
        .await?;
        Ok(due)
    }

    /// Record the fire. Guarded on the same calendar-date condition as the
    /// scan so overlapping ticks cannot fire a reminder twice in one day;
    /// returns false when another tick already won.
    pub async fn mark_triggered(&self, id: Uuid, now: DateTime<Utc>) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE reminders SET last_triggered = $1
             WHERE id = $2
               AND (last_triggered IS NULL OR last_triggered::date != $1::date)",
        )
        .bind(now)
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}

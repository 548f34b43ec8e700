use async_trait::async_trait;
use uuid::Uuid;

use crate::reminder::reminder_models::ReminderAlert;

/// Out-of-band delivery channel for fired reminders (push, email, ...).
/// Delivery is best-effort: the scheduler logs failures and never retries.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn deliver(&self, user_id: Uuid, alert: &ReminderAlert) -> anyhow::Result<()>;
}

/// Default sink: records the delivery in the log and nothing else.
pub struct LogNotifier;

#[async_trait]
impl NotificationSink for LogNotifier {
    async fn deliver(&self, user_id: Uuid, alert: &ReminderAlert) -> anyhow::Result<()> {
        tracing::info!("Reminder notification for user {}: {}", user_id, alert.title);
        Ok(())
    }
}

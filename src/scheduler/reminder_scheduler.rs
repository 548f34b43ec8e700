use chrono::{DateTime, Datelike, NaiveTime, Timelike, Utc};
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{error, info, warn};

use crate::{
    error::Result,
    reminder::reminder_models::{DueReminder, ReminderAlert},
    state::AppState,
    websocket::{Audience, ServerEvent},
};

/// Start the recurring reminder scan. Every minute, reminders whose
/// time-of-day and weekday match "now" and that have not yet fired today are
/// triggered; the `last_triggered` write is what makes delivery at-most-once
/// per calendar day.
pub async fn start_reminder_scheduler(
    state: AppState,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let scheduler = JobScheduler::new().await?;

    let job = Job::new_async("0 * * * * *", move |_uuid, _l| {
        let state = state.clone();

        Box::pin(async move {
            if let Err(e) = run_cycle(&state, Utc::now()).await {
                error!("Reminder scan failed, skipping this cycle: {:?}", e);
            }
        })
    })?;

    scheduler.add(job).await?;
    scheduler.start().await?;

    info!("Reminder scheduler started");
    Ok(())
}

/// One scan cycle. A failed scan skips the whole cycle (nothing is marked
/// fired, so the next successful cycle catches up); a failure on a single
/// reminder only skips that reminder.
pub(crate) async fn run_cycle(state: &AppState, now: DateTime<Utc>) -> Result<()> {
    let minute = truncate_to_minute(now.time());
    let weekday = now.weekday().num_days_from_sunday() as i16;

    let due = state
        .reminder_repository
        .find_due(minute, weekday, now)
        .await?;

    for reminder in due {
        if let Err(e) = trigger_reminder(state, &reminder, now).await {
            error!("Error triggering reminder {}: {:?}", reminder.id, e);
        }
    }

    Ok(())
}

async fn trigger_reminder(state: &AppState, due: &DueReminder, now: DateTime<Utc>) -> Result<()> {
    // The conditional write decides which tick fires; zero rows affected
    // means an overlapping tick already did.
    let fired = state.reminder_repository.mark_triggered(due.id, now).await?;
    if !fired {
        return Ok(());
    }

    let alert = ReminderAlert::from(due);
    state
        .connections
        .publish(Audience::User(due.user_id), ServerEvent::ReminderTriggered(alert.clone()));

    if due.user_notifications {
        if let Err(e) = state.notifier.deliver(due.user_id, &alert).await {
            warn!("Out-of-band delivery failed for user {}: {:?}", due.user_id, e);
        }
    }

    info!("Reminder triggered: {} for user {}", due.title, due.user_id);
    Ok(())
}

/// Match at minute resolution; the tick itself may land on any second.
pub(crate) fn truncate_to_minute(t: NaiveTime) -> NaiveTime {
    t.with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_truncate_to_minute() {
        let t = NaiveTime::from_hms_milli_opt(9, 0, 42, 137).unwrap();
        assert_eq!(truncate_to_minute(t), NaiveTime::from_hms_opt(9, 0, 0).unwrap());
    }

    #[test]
    fn test_weekday_indexing_is_sunday_based() {
        // 2025-08-04 is a Monday
        let monday = Utc.with_ymd_and_hms(2025, 8, 4, 9, 0, 0).unwrap();
        assert_eq!(monday.weekday().num_days_from_sunday(), 1);
        let sunday = Utc.with_ymd_and_hms(2025, 8, 3, 9, 0, 0).unwrap();
        assert_eq!(sunday.weekday().num_days_from_sunday(), 0);
    }
}

use serde::Serialize;
use uuid::Uuid;

use crate::community::post_models::{Post, PostComment};
use crate::goal::goal_models::Goal;
use crate::journal::journal_models::Journal;
use crate::mood::mood_models::{Mood, MoodStats};
use crate::reminder::reminder_models::{Reminder, ReminderAlert};

/// Recipient set of a published event: one user's sessions or every
/// connected session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Audience {
    User(Uuid),
    Global,
}

/// One variant per wire event; the tag is the event name the client
/// subscribes to.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", content = "data")]
pub enum ServerEvent {
    #[serde(rename = "mood:created")]
    MoodCreated { mood: Mood, stats: MoodStats },
    #[serde(rename = "mood:updated")]
    MoodUpdated { mood: Mood, stats: MoodStats },
    #[serde(rename = "mood:deleted")]
    MoodDeleted { mood_id: Uuid, stats: MoodStats },
    #[serde(rename = "journal:created")]
    JournalCreated { journal: Journal },
    #[serde(rename = "journal:updated")]
    JournalUpdated { journal: Journal },
    #[serde(rename = "journal:deleted")]
    JournalDeleted { journal_id: Uuid },
    #[serde(rename = "goal:changed")]
    GoalChanged(GoalChange),
    #[serde(rename = "reminder:created")]
    ReminderCreated { reminder: Reminder },
    #[serde(rename = "reminder:updated")]
    ReminderUpdated { reminder: Reminder },
    #[serde(rename = "reminder:deleted")]
    ReminderDeleted { reminder_id: Uuid },
    #[serde(rename = "reminder:triggered")]
    ReminderTriggered(ReminderAlert),
    #[serde(rename = "post:new")]
    PostNew { post: Post },
    #[serde(rename = "comment:new")]
    CommentNew { post_id: Uuid, comment: PostComment },
    #[serde(rename = "post:like-updated")]
    PostLikeUpdated {
        post_id: Uuid,
        likes_count: i64,
        liked: bool,
    },
    #[serde(rename = "post:deleted")]
    PostDeleted { post_id: Uuid },
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum GoalChange {
    Updated { goal: Goal },
    Deleted { goal_id: Uuid, deleted: bool },
}

impl GoalChange {
    pub fn updated(goal: Goal) -> Self {
        GoalChange::Updated { goal }
    }

    pub fn deleted(goal_id: Uuid) -> Self {
        GoalChange::Deleted { goal_id, deleted: true }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_names_on_the_wire() {
        let event = ServerEvent::ReminderDeleted { reminder_id: Uuid::new_v4() };
        let json: serde_json::Value = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "reminder:deleted");
        assert!(json["data"]["reminder_id"].is_string());

        let event = ServerEvent::PostLikeUpdated {
            post_id: Uuid::new_v4(),
            likes_count: 3,
            liked: true,
        };
        let json: serde_json::Value = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "post:like-updated");
        assert_eq!(json["data"]["likes_count"], 3);
    }

    #[test]
    fn test_reminder_triggered_payload() {
        let alert = ReminderAlert {
            id: Uuid::new_v4(),
            title: "Take pill".to_string(),
            description: None,
            kind: "medication".to_string(),
            time: "09:00".to_string(),
        };
        let json: serde_json::Value =
            serde_json::to_value(ServerEvent::ReminderTriggered(alert)).unwrap();
        assert_eq!(json["event"], "reminder:triggered");
        assert_eq!(json["data"]["type"], "medication");
        assert_eq!(json["data"]["time"], "09:00");
    }

    #[test]
    fn test_goal_change_shapes() {
        let goal_id = Uuid::new_v4();
        let json: serde_json::Value =
            serde_json::to_value(ServerEvent::GoalChanged(GoalChange::deleted(goal_id))).unwrap();
        assert_eq!(json["event"], "goal:changed");
        assert_eq!(json["data"]["deleted"], true);
        assert_eq!(json["data"]["goal_id"], goal_id.to_string());
    }
}

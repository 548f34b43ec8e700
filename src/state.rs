use crate::scheduler::NotificationSink;
use crate::websocket::ConnectionManager;
use std::sync::Arc;

use crate::community::post_repository::PostRepository;
use crate::goal::goal_repository::GoalRepository;
use crate::journal::journal_repository::JournalRepository;
use crate::mood::mood_repository::MoodRepository;
use crate::reminder::reminder_repository::ReminderRepository;
use crate::user::user_repository::UserRepository;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub connections: ConnectionManager,
    pub notifier: Arc<dyn NotificationSink>,
    pub user_repository: UserRepository,
    pub mood_repository: MoodRepository,
    pub journal_repository: JournalRepository,
    pub goal_repository: GoalRepository,
    pub reminder_repository: ReminderRepository,
    pub post_repository: PostRepository,
}

#[derive(Clone)]
pub struct Config {
    pub jwt_secret: String,
    pub jwt_expiration_days: i64,
    pub client_origin: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            jwt_secret: std::env::var("JWT_SECRET")
                .expect("JWT_SECRET must be set"),
            jwt_expiration_days: std::env::var("JWT_EXPIRATION_DAYS")
                .unwrap_or_else(|_| "7".to_string())
                .parse()
                .expect("JWT_EXPIRATION_DAYS must be a number"),
            client_origin: std::env::var("CLIENT_ORIGIN")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
        }
    }
}

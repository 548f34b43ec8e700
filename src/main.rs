mod auth;
mod community;
mod db;
mod error;
mod goal;
mod journal;
mod middleware;
mod mood;
mod reminder;
mod routes;
mod scheduler;
mod state;
mod user;
mod websocket;

use db::{create_pool, run_migrations};
use routes::create_router;
use scheduler::{start_reminder_scheduler, LogNotifier};
use state::{AppState, Config};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use websocket::ConnectionManager;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,wellness_tracker=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Arc::new(Config::from_env());

    let database_url = std::env::var("DATABASE_URL")
        .expect("DATABASE_URL must be set");

    tracing::info!("Connecting to database...");
    let db = create_pool(&database_url).await?;

    tracing::info!("Running migrations...");
    run_migrations(&db).await?;

    // Create repositories
    let user_repository = user::user_repository::UserRepository::new(db.clone());
    let mood_repository = mood::mood_repository::MoodRepository::new(db.clone());
    let journal_repository = journal::journal_repository::JournalRepository::new(db.clone());
    let goal_repository = goal::goal_repository::GoalRepository::new(db.clone());
    let reminder_repository = reminder::reminder_repository::ReminderRepository::new(db.clone());
    let post_repository = community::post_repository::PostRepository::new(db.clone());

    // Create application state
    let state = AppState {
        config: config.clone(),
        connections: ConnectionManager::new(),
        notifier: Arc::new(LogNotifier),
        user_repository,
        mood_repository,
        journal_repository,
        goal_repository,
        reminder_repository,
        post_repository,
    };

    // Start reminder scheduler
    let scheduler_state = state.clone();
    tokio::spawn(async move {
        if let Err(e) = start_reminder_scheduler(scheduler_state).await {
            tracing::error!("Reminder scheduler error: {:?}", e);
        }
    });

    // Create router
    let app = create_router(state);

    // Start server
    let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("{}:{}", host, port);

    tracing::info!("Server starting on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

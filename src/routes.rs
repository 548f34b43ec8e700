use crate::{
    auth::auth_dto::{AuthResponse, LoginRequest, RegisterRequest},
    auth::auth_handlers,
    community::community_dto::{CreateCommentRequest, CreatePostRequest},
    community::community_handlers,
    community::post_models::{Post, PostComment},
    goal::goal_dto::{CreateGoalRequest, UpdateGoalRequest},
    goal::goal_handlers,
    goal::goal_models::Goal,
    journal::journal_dto::{CreateJournalRequest, UpdateJournalRequest},
    journal::journal_handlers,
    journal::journal_models::Journal,
    middleware::{auth_middleware, optional_auth_middleware},
    mood::mood_dto::{CreateMoodRequest, UpdateMoodRequest},
    mood::mood_handlers,
    mood::mood_models::{Mood, MoodStats},
    reminder::reminder_dto::{CreateReminderRequest, UpdateReminderRequest},
    reminder::reminder_handlers,
    reminder::reminder_models::{Reminder, ReminderAlert, ReminderKind},
    state::AppState,
    user::user_dto::{UpdatePreferencesRequest, UpdateProfileRequest},
    user::user_handlers,
    user::user_models::{UserPreferences, UserResponse},
    websocket::ws_handler,
};
use axum::{
    http::HeaderValue,
    middleware,
    routing::{get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::auth::auth_handlers::register,
        crate::auth::auth_handlers::login,
        crate::mood::mood_handlers::create_mood,
        crate::mood::mood_handlers::get_moods,
        crate::mood::mood_handlers::get_mood_stats,
        crate::reminder::reminder_handlers::create_reminder,
        crate::reminder::reminder_handlers::get_reminders,
        crate::reminder::reminder_handlers::update_reminder,
        crate::reminder::reminder_handlers::delete_reminder,
        crate::community::community_handlers::create_post,
        crate::community::community_handlers::get_posts,
    ),
    components(
        schemas(
            RegisterRequest,
            LoginRequest,
            AuthResponse,
            UserResponse,
            UserPreferences,
            UpdateProfileRequest,
            UpdatePreferencesRequest,
            CreateMoodRequest,
            UpdateMoodRequest,
            Mood,
            MoodStats,
            CreateJournalRequest,
            UpdateJournalRequest,
            Journal,
            CreateGoalRequest,
            UpdateGoalRequest,
            Goal,
            CreateReminderRequest,
            UpdateReminderRequest,
            Reminder,
            ReminderAlert,
            ReminderKind,
            CreatePostRequest,
            CreateCommentRequest,
            Post,
            PostComment,
        )
    ),
    tags(
        (name = "auth", description = "Authentication endpoints"),
        (name = "mood", description = "Mood tracking endpoints"),
        (name = "reminders", description = "Reminder endpoints"),
        (name = "community", description = "Community feed endpoints")
    ),
    modifiers(&SecurityAddon)
)]
struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::Http::new(
                        utoipa::openapi::security::HttpAuthScheme::Bearer,
                    ),
                ),
            )
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    let origin = state
        .config
        .client_origin
        .parse::<HeaderValue>()
        .expect("CLIENT_ORIGIN must be a valid origin");
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(Any)
        .allow_headers(Any);

    // Public routes (no auth required)
    let auth_routes = Router::new()
        .route("/register", post(auth_handlers::register))
        .route("/login", post(auth_handlers::login))
        .route("/logout", post(auth_handlers::logout))
        .merge(
            Router::new()
                .route("/me", get(auth_handlers::me))
                .route_layer(middleware::from_fn_with_state(
                    state.clone(),
                    auth_middleware,
                )),
        );

    // Protected routes (auth required)
    let mood_routes = Router::new()
        .route("/", get(mood_handlers::get_moods).post(mood_handlers::create_mood))
        .route("/stats", get(mood_handlers::get_mood_stats))
        .route(
            "/:id",
            get(mood_handlers::get_mood)
                .put(mood_handlers::update_mood)
                .delete(mood_handlers::delete_mood),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let journal_routes = Router::new()
        .route(
            "/",
            get(journal_handlers::get_journals).post(journal_handlers::create_journal),
        )
        .route(
            "/:id",
            get(journal_handlers::get_journal)
                .put(journal_handlers::update_journal)
                .delete(journal_handlers::delete_journal),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let goal_routes = Router::new()
        .route("/", get(goal_handlers::get_goals).post(goal_handlers::create_goal))
        .route(
            "/:id",
            get(goal_handlers::get_goal)
                .put(goal_handlers::update_goal)
                .delete(goal_handlers::delete_goal),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let reminder_routes = Router::new()
        .route(
            "/",
            get(reminder_handlers::get_reminders).post(reminder_handlers::create_reminder),
        )
        .route(
            "/:id",
            get(reminder_handlers::get_reminder)
                .put(reminder_handlers::update_reminder)
                .delete(reminder_handlers::delete_reminder),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // Community reads work logged-out; the optional guard resolves an
    // identity when it can and the mutating handlers require one through
    // the AuthUser extractor.
    let community_routes = Router::new()
        .route(
            "/posts",
            get(community_handlers::get_posts).post(community_handlers::create_post),
        )
        .route(
            "/posts/:id",
            get(community_handlers::get_post).delete(community_handlers::delete_post),
        )
        .route("/posts/:id/like", post(community_handlers::like_post))
        .route("/posts/:id/comments", post(community_handlers::add_comment))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            optional_auth_middleware,
        ));

    let user_routes = Router::new()
        .route("/profile", get(user_handlers::get_profile).put(user_handlers::update_profile))
        .route("/preferences", put(user_handlers::update_preferences))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // Combine all routes
    let api_routes = Router::new()
        .nest("/auth", auth_routes)
        .nest("/mood", mood_routes)
        .nest("/journal", journal_routes)
        .nest("/goals", goal_routes)
        .nest("/reminders", reminder_routes)
        .nest("/community", community_routes)
        .nest("/user", user_routes)
        .route("/ws", get(ws_handler));

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest("/api", api_routes)
        .layer(cors)
        .with_state(state)
}

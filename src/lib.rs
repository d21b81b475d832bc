#![forbid(unsafe_code)]

use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use axum::{middleware, Router};
use std::sync::Arc;
use tower_cookies::CookieManagerLayer;
use tower_http::services::ServeDir;

pub mod config;
pub mod http;
pub mod impact;
pub mod model;
pub mod repo;
pub mod scheduler;
pub mod store;
pub mod views;

pub use config::{validate_startup_config, AppConfig, RuntimeMode};
pub use http::AppError;
pub use repo::memory::MemoryStore;
pub use repo::{ProjectStore, TaskStore, VolunteerStore};

/// The three entity repositories, constructed once at startup around the
/// owned connection handle and shared with handlers and the scheduler.
#[derive(Clone)]
pub struct Repositories {
    pub volunteers: Arc<dyn VolunteerStore>,
    pub tasks: Arc<dyn TaskStore>,
    pub projects: Arc<dyn ProjectStore>,
}

impl Repositories {
    #[must_use]
    pub fn mongo(db: &mongodb::Database) -> Self {
        Self {
            volunteers: Arc::new(repo::mongo::MongoVolunteers::new(db)),
            tasks: Arc::new(repo::mongo::MongoTasks::new(db)),
            projects: Arc::new(repo::mongo::MongoProjects::new(db)),
        }
    }

    /// Repositories over a shared in-memory store; the store handle is
    /// returned alongside for seeding and failure injection in tests.
    #[must_use]
    pub fn in_memory() -> (Self, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::default());
        let repos = Self {
            volunteers: Arc::clone(&store) as Arc<dyn VolunteerStore>,
            tasks: Arc::clone(&store) as Arc<dyn TaskStore>,
            projects: Arc::clone(&store) as Arc<dyn ProjectStore>,
        };
        (repos, store)
    }
}

#[derive(Clone)]
pub struct AppState {
    pub repos: Repositories,
    pub config: AppConfig,
}

/// Assembles the full pipeline: request log, body limit, cookies, static
/// assets, page-context injection, view routes, mounted CRUD modules, the
/// 404 fallback, and the centralized error boundary.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(http::pages::home_handler))
        .route("/about", get(http::pages::about_handler))
        .route("/impact", get(http::pages::impact_handler))
        .nest("/volunteers", http::volunteers::router())
        .nest("/tasks", http::tasks::router())
        .nest("/projects", http::projects::router())
        .nest_service("/public", ServeDir::new(state.config.static_dir.clone()))
        .fallback(http::error::not_found_handler)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            http::error::error_boundary,
        ))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            http::page_context_middleware,
        ))
        .layer(CookieManagerLayer::new())
        .layer(DefaultBodyLimit::max(state.config.max_body_bytes))
        .layer(middleware::from_fn(http::request_log_middleware))
        .with_state(state)
}

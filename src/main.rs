//! TaskRail - Multi-user task-list service
//! Mission: Token-guarded CRUD over users and todos, one SQLite file, no magic

mod auth;
mod config;
mod todos;

use anyhow::{Context, Result};
use axum::{extract::FromRef, routing::get, Router};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    auth::{api as auth_api, AuthState, JwtHandler, UserStore},
    config::Config,
    todos::{api as todo_api, TodoState, TodoStore},
};

/// Application state shared across all handlers
#[derive(Clone)]
struct AppState {
    auth: AuthState,
    todos: TodoState,
}

impl FromRef<AppState> for AuthState {
    fn from_ref(state: &AppState) -> AuthState {
        state.auth.clone()
    }
}

impl FromRef<AppState> for TodoState {
    fn from_ref(state: &AppState) -> TodoState {
        state.todos.clone()
    }
}

/// Build the full router.
///
/// `/health`, `GET /login`, and `POST /users` (signup) are open; everything
/// else resolves a `CurrentUser` from the x-access-token header and fails
/// with 401 before the handler body runs.
fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/login", get(auth_api::login))
        .route(
            "/users",
            get(auth_api::list_users).post(auth_api::create_user),
        )
        .route(
            "/users/:public_id",
            get(auth_api::get_user)
                .put(auth_api::update_user)
                .delete(auth_api::delete_user),
        )
        .route(
            "/todos",
            get(todo_api::list_todos).post(todo_api::create_todo),
        )
        .route(
            "/todos/:id",
            get(todo_api::get_todo)
                .put(todo_api::update_todo)
                .delete(todo_api::delete_todo),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize environment and logging
    config::load_env();
    init_tracing();

    let config = Config::from_env();

    info!("🚀 TaskRail starting");

    let user_store = Arc::new(UserStore::new(&config.db_path)?);
    let todo_store = Arc::new(TodoStore::new(&config.db_path)?);
    let jwt_handler = Arc::new(JwtHandler::new(config.jwt_secret.clone()));

    info!("📊 Database initialized at: {}", config.db_path);

    let state = AppState {
        auth: AuthState::new(user_store, jwt_handler),
        todos: TodoState::new(todo_store),
    };

    let listener = TcpListener::bind(&config.bind_addr).await?;
    info!("🎯 API server listening on {}", config.bind_addr);

    axum::serve(listener, app(state))
        .await
        .context("Server error")?;

    Ok(())
}

/// Initialize tracing with env-filter overrides
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "taskrail_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "TaskRail operational"
}

//! Volunteer Hub Backend
//!
//! A local mock backend for the volunteer/event front end: session store,
//! in-memory event directory and a simulated chat channel behind a REST API.

mod api;
mod browse;
mod chat;
mod clock;
mod config;
mod directory;
mod errors;
mod models;
mod session;
mod storage;

use std::sync::Arc;

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use chat::{ChatRoom, ChatSettings, ChatTransport, DEFAULT_ROOM};
use clock::{Clock, SystemClock};
use config::Config;
use directory::EventDirectory;
use session::SessionStore;
use storage::LocalStorage;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub session: Arc<SessionStore<LocalStorage>>,
    pub directory: Arc<EventDirectory>,
    pub chat: Arc<ChatRoom>,
}

impl AppState {
    /// Wire up every store from the configuration.
    pub async fn build(config: &Config, clock: Arc<dyn Clock>) -> Result<Self, errors::AppError> {
        let storage = LocalStorage::open(config.storage_path.as_deref()).await?;
        let session = SessionStore::restore(storage, clock.clone(), config.auth_latency).await;

        let directory = if config.seed_events {
            EventDirectory::seeded(clock.clone())
        } else {
            EventDirectory::new(clock.clone())
        };

        let transport = ChatTransport::new(
            clock.clone(),
            ChatSettings {
                broadcast_interval: config.chat_broadcast_interval,
                echo_delay: config.chat_echo_delay,
            },
        );
        let chat = ChatRoom::new(DEFAULT_ROOM, transport, clock);

        Ok(Self {
            session: Arc::new(session),
            directory: Arc::new(directory),
            chat: Arc::new(chat),
        })
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env();

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Volunteer Hub Backend");
    match &config.storage_path {
        Some(path) => tracing::info!("Storage path: {:?}", path),
        None => tracing::warn!("Using in-memory storage; sessions will not survive a restart"),
    }
    tracing::info!("Bind address: {}", config.bind_addr);

    let state = AppState::build(&config, Arc::new(SystemClock)).await?;
    tracing::info!(
        "Event directory ready with {} events",
        state.directory.len().await
    );
    if let Some(identity) = state.session.current().await {
        tracing::info!("Resuming session for {}", identity.email);
    }

    // Build router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API routes
    let api_routes = Router::new()
        // Session
        .route("/session", get(api::get_session))
        .route("/session/login", post(api::login))
        .route("/session/register", post(api::register))
        .route("/session/logout", post(api::logout))
        // Events
        .route("/events", get(api::list_events))
        .route("/events", post(api::create_event))
        .route("/events/{id}", get(api::get_event))
        .route("/events/{id}/registrations", post(api::register_volunteer))
        .route(
            "/events/{id}/registrations/{volunteer_id}",
            delete(api::unregister_volunteer),
        )
        .route(
            "/organizations/{id}/events",
            get(api::list_organization_events),
        )
        .route("/volunteers/{id}/events", get(api::list_volunteer_events))
        // Chat
        .route("/chat/join", post(api::join_chat))
        .route("/chat/leave", post(api::leave_chat))
        .route("/chat/messages", get(api::list_messages))
        .route("/chat/messages", post(api::send_message));

    // Health check
    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests;

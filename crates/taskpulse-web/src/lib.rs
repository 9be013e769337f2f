//! TaskPulse Web Server
//!
//! Axum-based REST API for tasks plus the `/ws` push channel that delivers
//! high-priority task notifications.

pub mod registry;
pub mod routes;
pub mod state;
pub mod websocket;

use axum::{
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use taskpulse_db::DbPool;
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub use registry::{BroadcastReport, ConnectionRegistry};
pub use state::AppState;

/// Network settings for the server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3030,
        }
    }
}

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route(
            "/tasks",
            get(routes::tasks::list_tasks).post(routes::tasks::create_task),
        )
        .route("/tasks/complete-all", post(routes::tasks::complete_all))
        .route("/tasks/completed", delete(routes::tasks::clear_completed))
        .route(
            "/tasks/{id}",
            get(routes::tasks::get_task)
                .patch(routes::tasks::update_task)
                .delete(routes::tasks::delete_task),
        )
        .route("/stats", get(routes::tasks::get_stats))
        .with_state(state.clone());

    Router::new()
        .nest("/api", api_routes)
        .route("/ws", get(websocket::ws_handler))
        .route("/internal/notify", post(routes::internal::notify))
        .route("/health", get(routes::health::health))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Serve `state` on an already bound listener until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> anyhow::Result<()>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    let app = create_router(state);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}

/// Run the web server until Ctrl+C.
pub async fn run_server(db: Arc<DbPool>, config: &ServerConfig) -> anyhow::Result<()> {
    let state = AppState::new(db);

    let listener = TcpListener::bind(config.addr()).await?;
    tracing::info!("Web server listening on http://{}", listener.local_addr()?);

    serve(listener, state, async {
        let _ = tokio::signal::ctrl_c().await;
        tracing::info!("Shutdown signal received");
    })
    .await
}

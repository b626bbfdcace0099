//! WebSocket relay server.
//!
//! One Axum server carries both connection classes; the request path decides
//! which one a socket becomes. A `/health` probe reports connection counts.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::ws::WebSocket;
use axum::extract::{ConnectInfo, State, WebSocketUpgrade};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use roverlink_core::config::{Config, ServerConfig};
use roverlink_core::DeviceRegistry;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::client::ClientRole;
use crate::control::DeviceRole;
use crate::error::GatewayError;
use crate::mediator::RelayMediator;
use crate::session;
use crate::Result;

/// Shared state for route handlers.
struct ServerState {
    mediator: Arc<RelayMediator>,
    queue_depth: usize,
}

/// The relay server.
pub struct RelayServer {
    state: Arc<ServerState>,
    config: ServerConfig,
}

impl RelayServer {
    /// Create a relay server from configuration, with a fresh registry.
    pub fn new(config: &Config) -> Self {
        let registry = Arc::new(DeviceRegistry::new(config.cooldown_policy()));
        let state = Arc::new(ServerState {
            mediator: Arc::new(RelayMediator::new(registry)),
            queue_depth: config.server.queue_depth,
        });

        Self {
            state,
            config: config.server.clone(),
        }
    }

    /// The mediator backing this server.
    pub fn mediator(&self) -> Arc<RelayMediator> {
        self.state.mediator.clone()
    }

    /// Bind the configured address and serve until the process stops.
    pub async fn run(&self) -> Result<()> {
        let addr = format!("{}:{}", self.config.bind, self.config.port);
        info!("Starting relay server on {}", addr);

        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(GatewayError::Io)?;
        self.serve(listener).await
    }

    /// Serve on an already-bound listener.
    ///
    /// Split from [`run`](Self::run) so callers can bind an ephemeral port
    /// first and read the bound address back.
    pub async fn serve(&self, listener: tokio::net::TcpListener) -> Result<()> {
        if let Ok(addr) = listener.local_addr() {
            info!(
                %addr,
                client_path = %self.config.client_path,
                device_path = %self.config.device_path,
                "relay listening"
            );
        }

        let app = self.create_router();
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| GatewayError::Internal(e.to_string()))?;

        info!("relay stopped");
        Ok(())
    }

    /// Create the Axum router.
    fn create_router(&self) -> Router {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        Router::new()
            .route(&self.config.client_path, get(client_ws_handler))
            .route(&self.config.device_path, get(device_ws_handler))
            .route("/health", get(health_handler))
            .layer(cors)
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }
}

/// Upgrade handler for the client path.
async fn client_ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<ServerState>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| client_session(socket, state, addr))
}

async fn client_session(socket: WebSocket, state: Arc<ServerState>, remote: SocketAddr) {
    let role = ClientRole::new(state.mediator.clone());
    session::pump(socket, role, state.queue_depth, remote).await;
}

/// Upgrade handler for the device path.
async fn device_ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<ServerState>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| device_session(socket, state, addr))
}

async fn device_session(socket: WebSocket, state: Arc<ServerState>, remote: SocketAddr) {
    let role = DeviceRole::new(state.mediator.clone());
    session::pump(socket, role, state.queue_depth, remote).await;
}

/// Health check handler.
async fn health_handler(State(state): State<Arc<ServerState>>) -> impl IntoResponse {
    serde_json::json!({
        "status": "ok",
        "devices": state.mediator.device_count(),
        "clients": state.mediator.client_count(),
    })
    .to_string()
}

/// Completes when the process should shut down (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("shutdown signal received, stopping relay");
}

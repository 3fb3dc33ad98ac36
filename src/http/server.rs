//! HTTP server implementation.

use std::net::SocketAddr;

use axum::http::{header, Method};
use axum::middleware::from_fn_with_state;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use super::handlers::{chat, health, health_details};
use super::middleware::rate_limit_middleware;
use super::state::AppState;
use crate::error::{MindcareError, Result};

/// HTTP server for the MindCare API.
pub struct HttpServer {
    /// Address to bind to
    addr: SocketAddr,
    /// Shared application state
    state: AppState,
}

impl HttpServer {
    /// Create a new HTTP server.
    pub fn new(addr: SocketAddr, state: AppState) -> Self {
        Self { addr, state }
    }

    /// Build the router with routes and middleware wired.
    ///
    /// Only the chat route sits behind the admission limiter; health routes
    /// stay reachable regardless of traffic.
    pub fn router(state: AppState) -> Router {
        let chat_routes = Router::new()
            .route("/api/chat", post(chat))
            .layer(from_fn_with_state(state.clone(), rate_limit_middleware));

        let health_routes = Router::new()
            .route("/health", get(health))
            .route("/health/details", get(health_details));

        Router::new()
            .merge(chat_routes)
            .merge(health_routes)
            .layer(TraceLayer::new_for_http())
            .layer(cors_layer())
            .with_state(state)
    }

    /// Start the HTTP server with graceful shutdown.
    ///
    /// The server will shut down when the provided signal resolves.
    pub async fn serve_with_shutdown<F>(self, signal: F) -> Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let app = Self::router(self.state)
            .into_make_service_with_connect_info::<SocketAddr>();

        info!(addr = %self.addr, "Starting HTTP server for MindCare API");

        let listener = tokio::net::TcpListener::bind(self.addr).await?;
        axum::serve(listener, app)
            .with_graceful_shutdown(signal)
            .await
            .map_err(|e| {
                error!(error = %e, "HTTP server failed");
                MindcareError::Io(e)
            })
    }
}

/// Permissive CORS for the browser dashboard.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .allow_origin(AllowOrigin::any())
}

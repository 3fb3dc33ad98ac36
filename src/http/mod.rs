//! HTTP server module for the MindCare API surface.

mod error;
mod handlers;
mod middleware;
mod server;
mod state;


pub use error::ApiError;
pub use handlers::{ChatRequest, ChatResponse};
pub use middleware::rate_limit_middleware;
pub use server::HttpServer;
pub use state::AppState;

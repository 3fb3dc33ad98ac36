//! Shared application state for the HTTP layer.

use std::sync::Arc;

use crate::chat::ChatClient;
use crate::ratelimit::RateLimiter;

/// State handed to every handler and middleware.
///
/// The limiter is owned here and nowhere else; handlers reach it only through
/// the rate-limit middleware.
#[derive(Clone)]
pub struct AppState {
    /// Admission limiter fronting the chat route
    pub limiter: Arc<RateLimiter>,
    /// Upstream chat-completion client
    pub chat: Arc<ChatClient>,
}

//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use neoterik_auth::session::SessionManager;
use neoterik_core::config::AppConfig;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Register/login/resolve/logout use cases
    pub session_manager: Arc<SessionManager>,
}

impl AppState {
    /// Creates the state from its parts.
    pub fn new(config: AppConfig, session_manager: SessionManager) -> Self {
        Self {
            config: Arc::new(config),
            session_manager: Arc::new(session_manager),
        }
    }
}

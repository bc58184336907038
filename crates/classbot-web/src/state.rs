//! Shared application state for the web server.
//!
//! [`AppState`] is wrapped in an `Arc` and shared across all request
//! handlers.  It also resolves the caller's session for handlers through the
//! [`CallerSession`] extractor.

use std::convert::Infallible;
use std::sync::Arc;
use std::time::Instant;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use classbot_store::{QaService, Session};

use crate::WebConfig;
use crate::cookie;

/// Shared state accessible from every Axum handler.
pub struct AppState {
    /// The five boundary operations and the stores behind them.
    pub service: QaService,

    /// Web server configuration.
    pub config: WebConfig,

    /// When the server state was built, for uptime reporting.
    pub started_at: Instant,
}

impl AppState {
    pub fn new(service: QaService, config: WebConfig) -> Self {
        Self {
            service,
            config,
            started_at: Instant::now(),
        }
    }
}

/// The session belonging to the caller of the current request.
///
/// Requests without a cookie, or with an unknown or expired token, get an
/// anonymous session.
pub struct CallerSession(pub Session);

impl FromRequestParts<Arc<AppState>> for CallerSession {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = cookie::session_token(&parts.headers, &state.config.cookie_name);
        let session = state.service.sessions().resolve(token.as_deref()).await;
        Ok(Self(session))
    }
}

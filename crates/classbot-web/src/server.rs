//! Main web server setup and startup.
//!
//! [`WebServer`] composes the Axum router, registers all routes, and runs
//! the HTTP listener until Ctrl-C.

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use classbot_store::QaService;
use tower_http::trace::TraceLayer;

use crate::WebConfig;
use crate::api;
use crate::pages;
use crate::state::AppState;

/// The classbot web server.
pub struct WebServer {
    config: WebConfig,
    state: Arc<AppState>,
}

impl WebServer {
    /// Create a new web server.
    ///
    /// # Arguments
    ///
    /// * `config` - Bind address, port, and cookie settings.
    /// * `service` - The operations every request is dispatched to.
    pub fn new(config: WebConfig, service: QaService) -> Self {
        let state = Arc::new(AppState::new(service, config.clone()));
        Self { config, state }
    }

    /// Return the `host:port` string this server will bind to.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.config.bind_addr, self.config.port)
    }

    /// Build the Axum router with all routes registered.
    pub fn router(&self) -> Router {
        Router::new()
            // Pages.
            .route("/", get(pages::home))
            .route("/login", get(pages::login_page).post(pages::login))
            .route("/signup", get(pages::signup_page).post(pages::signup))
            .route("/logout", get(pages::logout))
            .route(
                "/add_question",
                get(pages::add_question_page).post(pages::add_question),
            )
            // JSON API.
            .route("/api/get_answer", post(api::get_answer))
            .route("/api/status", get(api::status))
            .layer(TraceLayer::new_for_http())
            .with_state(Arc::clone(&self.state))
    }

    /// Start the server and block until it is shut down.
    ///
    /// # Errors
    ///
    /// Returns an error if the TCP listener cannot be bound.
    pub async fn start(self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let addr = self.addr();
        let router = self.router();

        tracing::info!(addr = %addr, "starting web server");

        let listener = tokio::net::TcpListener::bind(&addr).await?;
        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("web server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for ctrl-c, running until killed");
        std::future::pending::<()>().await;
    }
}

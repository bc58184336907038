//! Web interface for classbot.
//!
//! This crate provides the HTTP server in front of [`classbot_store::QaService`]:
//!
//! - A JSON endpoint answering chat-widget questions.
//! - Form-based login, signup, logout, and add-question pages.
//! - A cookie carrying the opaque session token.
//! - A status endpoint with corpus and session counts.

pub mod api;
pub mod cookie;
pub mod error;
pub mod frontend;
pub mod pages;
pub mod server;
pub mod state;

pub use error::WebError;
pub use server::WebServer;
pub use state::AppState;

/// Web server configuration.
#[derive(Debug, Clone)]
pub struct WebConfig {
    /// The address to bind the HTTP server to.
    pub bind_addr: String,
    /// The port to listen on.
    pub port: u16,
    /// Name of the cookie holding the session token.
    pub cookie_name: String,
    /// Mark the session cookie `Secure` (only sent over HTTPS).
    pub secure_cookie: bool,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1".into(),
            port: 5000,
            cookie_name: "classbot_session".into(),
            secure_cookie: false,
        }
    }
}

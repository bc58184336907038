//! Per-caller login sessions.
//!
//! A [`Session`] is the explicit context handed to every operation: it is
//! either [`SessionState::Anonymous`] or [`SessionState::Authenticated`].
//! [`SessionGate`] maps opaque bearer tokens to logged-in usernames in a
//! `moka` cache whose time-to-live is the session expiry policy.  The table
//! is bounded by evicting the oldest sessions before a new one is stored, so
//! a fresh login is never dropped in favour of older entries.

use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use moka::future::Cache;
use ring::rand::{SecureRandom, SystemRandom};
use tracing::debug;

use crate::error::{StoreError, StoreResult};

/// Random bytes in a session token before encoding.
const TOKEN_BYTES: usize = 32;

// ═══════════════════════════════════════════════════════════════════════
//  Types
// ═══════════════════════════════════════════════════════════════════════

/// Who the caller is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Anonymous,
    Authenticated(String),
}

/// Session context for one caller.
///
/// `token` is the bearer token the transport hands back to the caller; it is
/// `Some` exactly when the state is authenticated.
#[derive(Debug, Clone)]
pub struct Session {
    token: Option<String>,
    state: SessionState,
}

impl Session {
    /// A fresh, unauthenticated session.
    pub fn anonymous() -> Self {
        Self {
            token: None,
            state: SessionState::Anonymous,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// The logged-in username, if any.
    pub fn username(&self) -> Option<&str> {
        match &self.state {
            SessionState::Authenticated(u) => Some(u),
            SessionState::Anonymous => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.username().is_some()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::anonymous()
    }
}

#[derive(Debug, Clone)]
struct SessionRecord {
    username: String,
    created_at: DateTime<Utc>,
}

// ═══════════════════════════════════════════════════════════════════════
//  SessionGate
// ═══════════════════════════════════════════════════════════════════════

/// Token-to-username table with expiry.
#[derive(Clone)]
pub struct SessionGate {
    sessions: Cache<String, SessionRecord>,
    ttl: Duration,
    max_sessions: u64,
}

impl SessionGate {
    /// Create a gate whose sessions expire `ttl` after login, holding at
    /// most `max_sessions` live sessions.
    pub fn new(ttl: Duration, max_sessions: u64) -> Self {
        let sessions = Cache::builder().time_to_live(ttl).build();
        Self {
            sessions,
            ttl,
            max_sessions: max_sessions.max(1),
        }
    }

    /// Session lifetime.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Look up the session for a presented token.
    ///
    /// Missing, unknown, and expired tokens all resolve to an anonymous
    /// session.
    pub async fn resolve(&self, token: Option<&str>) -> Session {
        let Some(token) = token else {
            return Session::anonymous();
        };

        match self.sessions.get(token).await {
            Some(record) => {
                debug!(
                    username = %record.username,
                    since = %record.created_at,
                    "session resolved"
                );
                Session {
                    token: Some(token.to_owned()),
                    state: SessionState::Authenticated(record.username),
                }
            }
            None => Session::anonymous(),
        }
    }

    /// Move `session` to `Authenticated(username)` under a newly issued
    /// token. Any token the session held before is revoked.
    pub async fn establish(&self, session: &mut Session, username: &str) -> StoreResult<()> {
        let token = generate_token()?;

        if let Some(old) = session.token.take() {
            self.sessions.invalidate(&old).await;
        }
        self.make_room().await;

        self.sessions
            .insert(
                token.clone(),
                SessionRecord {
                    username: username.to_owned(),
                    created_at: Utc::now(),
                },
            )
            .await;

        session.token = Some(token);
        session.state = SessionState::Authenticated(username.to_owned());
        debug!(username, "session established");
        Ok(())
    }

    /// Move `session` back to `Anonymous`, revoking its token.
    pub async fn clear(&self, session: &mut Session) {
        if let Some(token) = session.token.take() {
            self.sessions.invalidate(&token).await;
        }
        session.state = SessionState::Anonymous;
    }

    /// Evict the oldest sessions until one more fits under the bound.
    async fn make_room(&self) {
        self.sessions.run_pending_tasks().await;
        let live = self.sessions.entry_count();
        if live < self.max_sessions {
            return;
        }

        let excess = (live - self.max_sessions + 1) as usize;
        let mut by_age: Vec<_> = self
            .sessions
            .iter()
            .map(|(token, record)| (record.created_at, token))
            .collect();
        by_age.sort_by_key(|(created_at, _)| *created_at);

        for (_, token) in by_age.into_iter().take(excess) {
            self.sessions.invalidate(token.as_str()).await;
        }
        debug!(evicted = excess, "session table full, oldest sessions evicted");
    }

    /// Approximate number of live sessions.
    pub async fn active_sessions(&self) -> u64 {
        self.sessions.run_pending_tasks().await;
        self.sessions.entry_count()
    }
}

fn generate_token() -> StoreResult<String> {
    let mut bytes = [0u8; TOKEN_BYTES];
    SystemRandom::new()
        .fill(&mut bytes)
        .map_err(|_| StoreError::Hash("failed to generate session token".into()))?;
    Ok(URL_SAFE_NO_PAD.encode(bytes))
}

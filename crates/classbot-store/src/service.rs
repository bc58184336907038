//! The five boundary operations: ask, login, signup, logout, add-question.
//!
//! [`QaService`] owns the corpus, the account store, and the session gate.
//! Transports (HTTP, CLI) resolve a [`Session`] for the caller, call one
//! operation, and turn the returned outcome into their own response.

use tracing::{info, instrument, warn};

use crate::accounts::AccountStore;
use crate::corpus::CorpusStore;
use crate::error::StoreResult;
use crate::session::{Session, SessionGate};

/// Result of a login attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginOutcome {
    /// Credentials matched; the session is now authenticated.
    LoggedIn,
    /// Unknown username or wrong password. The two are deliberately
    /// indistinguishable.
    Denied,
}

/// Result of a gated write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The record was appended and persisted.
    Added,
    /// The caller is anonymous; nothing was written.
    LoginRequired,
}

/// Entry point for every operation a caller can perform.
#[derive(Clone)]
pub struct QaService {
    corpus: CorpusStore,
    accounts: AccountStore,
    sessions: SessionGate,
}

impl QaService {
    pub fn new(corpus: CorpusStore, accounts: AccountStore, sessions: SessionGate) -> Self {
        Self {
            corpus,
            accounts,
            sessions,
        }
    }

    pub fn corpus(&self) -> &CorpusStore {
        &self.corpus
    }

    pub fn accounts(&self) -> &AccountStore {
        &self.accounts
    }

    pub fn sessions(&self) -> &SessionGate {
        &self.sessions
    }

    /// Look up an answer. Open to everyone; never fails.
    pub async fn ask(&self, query: &str, subject: &str) -> String {
        self.corpus.find_answer(query, subject).await
    }

    /// Verify credentials and, on success, authenticate `session`.
    ///
    /// A failed attempt leaves the session exactly as it was.
    #[instrument(skip(self, session, password))]
    pub async fn login(
        &self,
        session: &mut Session,
        username: &str,
        password: &str,
    ) -> StoreResult<LoginOutcome> {
        if !self.accounts.verify(username, password).await? {
            warn!("login denied");
            return Ok(LoginOutcome::Denied);
        }

        self.sessions.establish(session, username).await?;
        info!("login succeeded");
        Ok(LoginOutcome::LoggedIn)
    }

    /// Create an account. Does not log the caller in.
    pub async fn signup(&self, username: &str, password: &str) -> StoreResult<()> {
        self.accounts.create_account(username, password).await
    }

    /// Return `session` to anonymous. Always succeeds.
    pub async fn logout(&self, session: &mut Session) {
        if let Some(user) = session.username() {
            info!(username = %user, "logout");
        }
        self.sessions.clear(session).await;
    }

    /// Append a question, provided the caller is logged in.
    #[instrument(skip(self, session, question, answer), fields(user = session.username()))]
    pub async fn add_question(
        &self,
        session: &Session,
        subject: &str,
        question: &str,
        answer: &str,
    ) -> StoreResult<WriteOutcome> {
        if !session.is_authenticated() {
            warn!("anonymous write refused");
            return Ok(WriteOutcome::LoginRequired);
        }

        self.corpus.add_record(subject, question, answer).await?;
        Ok(WriteOutcome::Added)
    }
}

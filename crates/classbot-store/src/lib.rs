//! # classbot-store
//!
//! Storage engine for classbot.
//!
//! Two append-only collections live in memory and are rewritten to JSON
//! files after every mutation, plus an in-memory session table:
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  QaService (ask / login / signup /      │
//! │             logout / add_question)      │
//! ├─────────────┬─────────────┬─────────────┤
//! │ CorpusStore │ AccountStore│ SessionGate │
//! │ (QaRecord)  │ (PBKDF2)    │ (moka, TTL) │
//! ├─────────────┴─────────────┴─────────────┤
//! │  persist: JSON array, temp + rename     │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Quick start
//!
//! ```ignore
//! use classbot_store::{AccountStore, CorpusStore, QaService, Session, SessionGate};
//!
//! let corpus = CorpusStore::open("questions.json").await?;
//! let accounts = AccountStore::open("users.json").await?;
//! let sessions = SessionGate::new(Duration::from_secs(86_400), 10_000);
//! let service = QaService::new(corpus, accounts, sessions);
//!
//! let answer = service.ask("2+2", "math").await;
//! ```

pub mod accounts;
pub mod corpus;
pub mod error;
pub mod password;
pub mod persist;
pub mod service;
pub mod session;

// ── re-exports ───────────────────────────────────────────────────────

pub use accounts::{AccountStore, UserAccount};
pub use corpus::{CorpusStore, NO_ANSWER, QaRecord};
pub use error::{StoreError, StoreResult};
pub use service::{LoginOutcome, QaService, WriteOutcome};
pub use session::{Session, SessionGate, SessionState};

//! User accounts.
//!
//! [`AccountStore`] keeps every [`UserAccount`] in signup order and rewrites
//! its backing JSON file after each signup.  Passwords are only ever held as
//! salted PBKDF2 hashes (see [`crate::password`]).

use std::collections::HashSet;
use std::num::NonZeroU32;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};

use crate::error::{StoreError, StoreResult};
use crate::password::{self, DEFAULT_ITERATIONS};
use crate::persist;

/// A stored credential record.
///
/// The hash is serialized under the `password` key to stay compatible with
/// existing `users.json` files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAccount {
    pub username: String,
    #[serde(rename = "password")]
    pub password_hash: String,
}

/// Append-only, file-backed collection of [`UserAccount`]s.
#[derive(Clone)]
pub struct AccountStore {
    path: PathBuf,
    iterations: NonZeroU32,
    accounts: Arc<RwLock<Vec<UserAccount>>>,
}

impl AccountStore {
    /// Load accounts from `path`. A missing file yields an empty store.
    pub async fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();
        let load_path = path.clone();
        let accounts =
            tokio::task::spawn_blocking(move || persist::load_json_array::<UserAccount>(&load_path))
                .await??;

        let mut seen = HashSet::new();
        for account in &accounts {
            if !seen.insert(account.username.as_str()) {
                warn!(
                    username = %account.username,
                    "duplicate username in account file, login uses the first entry"
                );
            }
        }

        info!(path = %path.display(), accounts = accounts.len(), "accounts loaded");
        Ok(Self {
            path,
            iterations: default_iterations(),
            accounts: Arc::new(RwLock::new(accounts)),
        })
    }

    /// Use `iterations` PBKDF2 rounds for newly created hashes.
    ///
    /// Existing hashes keep the count they were written with.
    pub fn with_iterations(mut self, iterations: u32) -> Self {
        self.iterations = NonZeroU32::new(iterations).unwrap_or_else(default_iterations);
        self
    }

    /// The backing file this store persists to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check a login attempt.
    ///
    /// Returns `true` only when an account named exactly `username` exists
    /// (first match in signup order) and `password` matches its hash.  An
    /// unknown username costs the same hashing work as a wrong password.
    #[instrument(skip(self, password))]
    pub async fn verify(&self, username: &str, password: &str) -> StoreResult<bool> {
        let (stored, decoy) = {
            let accounts = self.accounts.read().await;
            let stored = accounts
                .iter()
                .find(|a| a.username == username)
                .map(|a| a.password_hash.clone());
            let decoy = match stored {
                Some(_) => self.iterations,
                None => decoy_iterations(&accounts).unwrap_or(self.iterations),
            };
            (stored, decoy)
        };

        let password = password.to_owned();
        let valid = tokio::task::spawn_blocking(move || match stored {
            Some(hash) => password::verify_password(&password, &hash),
            None => {
                password::burn_verification(&password, decoy);
                false
            }
        })
        .await?;

        debug!(valid, "credentials checked");
        Ok(valid)
    }

    /// Create an account with a freshly salted hash of `password`.
    ///
    /// Rejects an empty username and a username that already exists.
    /// Password content is not constrained.
    #[instrument(skip(self, password))]
    pub async fn create_account(&self, username: &str, password: &str) -> StoreResult<()> {
        if username.is_empty() {
            return Err(StoreError::InvalidArgument(
                "username must not be empty".into(),
            ));
        }

        // Hash before taking the lock (CPU-intensive).
        let owned = password.to_owned();
        let iterations = self.iterations;
        let password_hash =
            tokio::task::spawn_blocking(move || password::hash_password(&owned, iterations))
                .await??;

        let account = UserAccount {
            username: username.to_owned(),
            password_hash,
        };
        let taken = username.to_owned();
        let accounts = persist::append_persisted(
            Arc::clone(&self.accounts),
            self.path.clone(),
            account,
            move |current: &[UserAccount]| {
                if current.iter().any(|a| a.username == taken) {
                    Err(StoreError::UsernameTaken(taken))
                } else {
                    Ok(())
                }
            },
        )
        .await?;

        info!(accounts, "account created");
        Ok(())
    }

    /// Whether an account named `username` exists.
    pub async fn contains(&self, username: &str) -> bool {
        self.accounts
            .read()
            .await
            .iter()
            .any(|a| a.username == username)
    }

    /// Number of stored accounts.
    pub async fn len(&self) -> usize {
        self.accounts.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

/// Highest iteration count among stored hashes, so a lookup for an unknown
/// user costs as much as the slowest real verification.
fn decoy_iterations(accounts: &[UserAccount]) -> Option<NonZeroU32> {
    accounts
        .iter()
        .filter_map(|a| password::hash_iterations(&a.password_hash))
        .max()
}

fn default_iterations() -> NonZeroU32 {
    NonZeroU32::new(DEFAULT_ITERATIONS).unwrap_or(NonZeroU32::MIN)
}

//! Salted PBKDF2-HMAC-SHA256 password hashing (ring).
//!
//! Hashes are stored as `pbkdf2:sha256:<iterations>$<salt>$<hex digest>`,
//! the layout written by Werkzeug's `generate_password_hash`, so account
//! files created by earlier Python deployments keep verifying.

use std::num::NonZeroU32;

use ring::pbkdf2;
use ring::rand::{SecureRandom, SystemRandom};
use tracing::warn;

use crate::error::{StoreError, StoreResult};

/// PBKDF2-HMAC-SHA256 with 600,000 iterations (OWASP 2023).
pub const DEFAULT_ITERATIONS: u32 = 600_000;

/// Number of characters in a generated salt.
const SALT_LEN: usize = 16;

/// Derived key length in bytes.
const KEY_LEN: usize = 32;

const SALT_CHARS: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

static PBKDF2_ALG: pbkdf2::Algorithm = pbkdf2::PBKDF2_HMAC_SHA256;

const METHOD_PREFIX: &str = "pbkdf2:sha256:";

/// Hash `password` with a fresh random salt.
pub fn hash_password(password: &str, iterations: NonZeroU32) -> StoreResult<String> {
    let salt = generate_salt()?;

    let mut hash = [0u8; KEY_LEN];
    pbkdf2::derive(
        PBKDF2_ALG,
        iterations,
        salt.as_bytes(),
        password.as_bytes(),
        &mut hash,
    );

    Ok(format!(
        "{METHOD_PREFIX}{iterations}${salt}${}",
        hex::encode(hash)
    ))
}

/// Check `password` against a stored hash string.
///
/// The digest comparison is constant-time.  Hashes in an unknown or
/// malformed layout never verify.
pub fn verify_password(password: &str, stored: &str) -> bool {
    let Some(parsed) = ParsedHash::parse(stored) else {
        warn!("stored password hash uses an unsupported layout");
        return false;
    };

    pbkdf2::verify(
        PBKDF2_ALG,
        parsed.iterations,
        parsed.salt.as_bytes(),
        password.as_bytes(),
        &parsed.digest,
    )
    .is_ok()
}

/// Spend the same work as a real verification without a stored hash.
///
/// Used when the username is unknown so the response time does not reveal
/// whether the account exists.
pub fn burn_verification(password: &str, iterations: NonZeroU32) {
    let mut sink = [0u8; KEY_LEN];
    pbkdf2::derive(
        PBKDF2_ALG,
        iterations,
        b"no-such-account!",
        password.as_bytes(),
        &mut sink,
    );
}

/// Iteration count recorded in a stored hash, if the layout is supported.
pub fn hash_iterations(stored: &str) -> Option<NonZeroU32> {
    ParsedHash::parse(stored).map(|p| p.iterations)
}

struct ParsedHash<'a> {
    iterations: NonZeroU32,
    salt: &'a str,
    digest: Vec<u8>,
}

impl<'a> ParsedHash<'a> {
    fn parse(stored: &'a str) -> Option<Self> {
        let mut parts = stored.splitn(3, '$');
        let method = parts.next()?;
        let salt = parts.next()?;
        let digest = parts.next()?;

        let iterations = method
            .strip_prefix(METHOD_PREFIX)?
            .parse::<u32>()
            .ok()
            .and_then(NonZeroU32::new)?;
        let digest = hex::decode(digest).ok()?;
        if digest.is_empty() {
            return None;
        }

        Some(Self {
            iterations,
            salt,
            digest,
        })
    }
}

fn generate_salt() -> StoreResult<String> {
    let rng = SystemRandom::new();
    let mut salt = String::with_capacity(SALT_LEN);
    let mut buf = [0u8; SALT_LEN * 2];

    // Rejection sampling keeps every character equally likely.
    let limit = (256 / SALT_CHARS.len() * SALT_CHARS.len()) as u8;
    while salt.len() < SALT_LEN {
        rng.fill(&mut buf)
            .map_err(|_| StoreError::Hash("failed to generate random salt".into()))?;
        for &b in buf.iter().filter(|&&b| b < limit) {
            if salt.len() == SALT_LEN {
                break;
            }
            salt.push(SALT_CHARS[b as usize % SALT_CHARS.len()] as char);
        }
    }
    Ok(salt)
}

//! Salted adaptive password hashing (bcrypt over a SHA-256 pre-hash).
//!
//! Work factor 10 is the deployed cost/latency tradeoff: roughly 2^10 key
//! expansion rounds per hash. It is fixed at build time through
//! [`DEFAULT_COST_FACTOR`] and may be raised per deployment with
//! `BCRYPT_COST`. Existing hashes carry their own cost, so changing it only
//! affects newly created credentials.

use base64::Engine;
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::error::HubError;

pub const DEFAULT_COST_FACTOR: u32 = 10;

const MIN_COST: u32 = 4;
const MAX_COST: u32 = 31;

/// bcrypt only consumes the first 72 bytes of its input.
#[cfg(test)]
const BCRYPT_MAX_INPUT: usize = 72;

#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordHasher {
    pub fn new() -> Self {
        Self {
            cost: DEFAULT_COST_FACTOR,
        }
    }

    pub fn with_cost(cost: u32) -> Result<Self, HubError> {
        if !(MIN_COST..=MAX_COST).contains(&cost) {
            return Err(HubError::InvalidHashCost(cost));
        }
        Ok(Self { cost })
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Hash `plaintext` with a fresh random salt. Runs on the blocking pool.
    pub async fn hash(&self, plaintext: &str) -> Result<String, HubError> {
        let cost = self.cost;
        let input = prepare(plaintext);
        let hashed = tokio::task::spawn_blocking(move || bcrypt::hash(input, cost)).await??;
        debug!(cost, "password hashed");
        Ok(hashed)
    }

    /// Check `plaintext` against a stored hash using the salt and cost
    /// embedded in it. Mismatch is `Ok(false)`; a malformed hash is an error.
    pub async fn verify(&self, plaintext: &str, hashed: &str) -> Result<bool, HubError> {
        let input = prepare(plaintext);
        let hashed = hashed.to_owned();
        let ok = tokio::task::spawn_blocking(move || bcrypt::verify(input, &hashed)).await??;
        Ok(ok)
    }
}

/// Every input is condensed to base64(SHA-256) before bcrypt sees it, so
/// bytes past bcrypt's 72-byte limit still count and a raw input can never
/// collide with another input's digest.
fn prepare(plaintext: &str) -> Vec<u8> {
    let digest = Sha256::digest(plaintext.as_bytes());
    base64::engine::general_purpose::STANDARD
        .encode(digest)
        .into_bytes()
}

//! Duplicate-submission protection.
//!
//! Forms carry a one-shot `multireqtoken`. The first request presenting a token
//! records it; any later request with the same token is a duplicate.

use std::{
    collections::VecDeque,
    sync::{Mutex, PoisonError},
};
use tracing::trace;
use uuid::Uuid;

/// Number of tokens remembered by [`InMemoryTokenStore::new`]
pub const DEFAULT_TOKEN_CAPACITY: usize = 500;

/// Store of already-used request tokens
pub trait MultiRequestProtection: Send + Sync {
    /// Returns `true` if `token` was seen before; otherwise records it and returns `false`.
    fn token_exists(&self, token: &str) -> bool;

    /// Issues a fresh token for a form
    fn new_token(&self) -> String {
        Uuid::new_v4().simple().to_string()
    }
}

/// Token store kept in process memory, bounded to the most recent tokens
#[derive(Debug)]
pub struct InMemoryTokenStore {
    seen: Mutex<VecDeque<String>>,
    capacity: usize,
}

impl InMemoryTokenStore {
    /// Creates a store remembering [`DEFAULT_TOKEN_CAPACITY`] tokens
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_TOKEN_CAPACITY)
    }

    /// Creates a store remembering at most `capacity` tokens (at least one)
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            seen: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }
}

impl Default for InMemoryTokenStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MultiRequestProtection for InMemoryTokenStore {
    fn token_exists(&self, token: &str) -> bool {
        // A poisoned lock still holds a consistent queue of strings
        let mut seen = self.seen.lock().unwrap_or_else(PoisonError::into_inner);
        if seen.iter().any(|known| known == token) {
            return true;
        }

        if seen.len() >= self.capacity {
            seen.pop_front();
        }
        seen.push_back(token.to_string());
        trace!("Recorded request token, {} remembered", seen.len());
        false
    }
}

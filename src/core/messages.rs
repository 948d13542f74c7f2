//! User-visible message log.
//!
//! Messages are identified by a translation key plus named placeholders
//! (`incompatible-document` with `%code%`). Each one is also emitted as a
//! tracing event so operators see what users saw.

use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{error, info, warn};

/// Severity of a user-visible message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    /// Success or informational notice
    Notice,
    /// Something was skipped or refused
    Warning,
    /// An operation failed
    Error,
}

/// One logged message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    /// Severity
    pub level: Level,
    /// Translation key
    pub key: String,
    /// Placeholder values, keyed like `%code%`
    pub context: BTreeMap<String, String>,
}

/// Messages accumulated while handling one request
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct MessageLog {
    messages: Vec<Message>,
}

impl MessageLog {
    /// Creates an empty log
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Logs a notice
    pub fn notice(&mut self, key: &str) {
        self.push(Level::Notice, key, &[]);
    }

    /// Logs a warning with placeholder values
    pub fn warning(&mut self, key: &str, context: &[(&str, &str)]) {
        self.push(Level::Warning, key, context);
    }

    /// Logs an error
    pub fn error(&mut self, key: &str) {
        self.push(Level::Error, key, &[]);
    }

    fn push(&mut self, level: Level, key: &str, context: &[(&str, &str)]) {
        let context: BTreeMap<String, String> = context
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();

        match level {
            Level::Notice => info!(key, ?context, "user notice"),
            Level::Warning => warn!(key, ?context, "user warning"),
            Level::Error => error!(key, ?context, "user error"),
        }

        self.messages.push(Message {
            level,
            key: key.to_string(),
            context,
        });
    }

    /// All messages in the order they were logged
    #[must_use]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// True if a message with `key` was logged
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.messages.iter().any(|m| m.key == key)
    }

    /// True when nothing was logged
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

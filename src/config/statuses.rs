//! Document status configuration loading from config.toml
//!
//! The statuses listed in config.toml describe the document workflow: which
//! statuses exist per document type and which model each one generates. They
//! are used to seed the database on first run or when statuses are missing.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Deserialize)]
pub struct Config {
    /// List of document statuses to seed
    #[serde(default)]
    pub statuses: Vec<StatusConfig>,
}

/// Configuration for a single document status
#[derive(Debug, Deserialize, Clone)]
pub struct StatusConfig {
    /// Fixed status id, referenced by the `status` request parameter
    pub id: i32,
    /// Model name the status belongs to (e.g. `"CustomerOrder"`)
    pub doc_type: String,
    /// Display name
    pub name: String,
    /// Model name generated when a document reaches this status
    #[serde(default)]
    pub generates: Option<String>,
    /// Whether new documents of this type start in this status
    #[serde(default)]
    pub is_default: bool,
    /// Whether documents in this status remain editable
    #[serde(default = "default_editable")]
    pub editable: bool,
}

const fn default_editable() -> bool {
    true
}

/// Loads the status configuration from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - Required fields are missing
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;

    parse_config(&contents)
}

/// Parses status configuration from TOML text
pub fn parse_config(contents: &str) -> Result<Config> {
    toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

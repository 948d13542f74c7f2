//! Unified error types for the document stitcher.
//!
//! Business rejections (incompatible documents, duplicated requests, failed
//! generation) are reported through the message log instead; these variants
//! cover configuration and infrastructure failures.

use thiserror::Error;

/// Errors raised by configuration, persistence and generation.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be read or parsed.
    #[error("Configuration error: {message}")]
    Config {
        /// Human-readable description of the failure
        message: String,
    },

    /// Underlying SeaORM / database failure.
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// No document of the requested type has this code.
    #[error("Document not found: {code}")]
    DocumentNotFound {
        /// Code that was looked up
        code: String,
    },

    /// No document status has this id.
    #[error("Document status not found: {id}")]
    StatusNotFound {
        /// Status id that was looked up
        id: i32,
    },

    /// The model name is not a registered transformable document type.
    #[error("Unknown document model: {name}")]
    UnknownModel {
        /// Model name as received
        name: String,
    },

    /// A line quantity is negative or not a finite number.
    #[error("Invalid quantity: {quantity}")]
    InvalidQuantity {
        /// Offending quantity
        quantity: f64,
    },

    /// The document generator refused or failed to build the new document.
    #[error("Document generation failed: {message}")]
    Generation {
        /// Reason reported by the generator
        message: String,
    },

    /// I/O failure (config files, listener sockets).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Environment variable could not be read.
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;

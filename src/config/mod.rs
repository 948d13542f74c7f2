/// Database configuration and connection management
pub mod database;

/// Server settings from environment variables
pub mod server;

/// Document status configuration loading from config.toml
pub mod statuses;

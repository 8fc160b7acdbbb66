use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the migration harness
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid path alias: {0}")]
    InvalidPathAlias(String),

    #[error("The migration path does not exist: {}", .0.display())]
    MissingMigrationPath(PathBuf),

    #[error("Database connection error: {0}")]
    DatabaseConnection(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Failure raised by the wrapped migration engine. Opaque to the
    /// harness: the message is forwarded unchanged, never translated.
    #[error("{0}")]
    Engine(Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn database_connection(msg: impl Into<String>) -> Self {
        Self::DatabaseConnection(msg.into())
    }

    pub fn engine(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Engine(err.into())
    }
}

//! Error types for the migration library.

use thiserror::Error;

/// Main error type for migration operations.
#[derive(Error, Debug)]
pub enum MigrateError {
    /// Configuration error (invalid source installation, malformed URL,
    /// missing credential key, bad flag value).
    #[error("Configuration error: {0}")]
    Config(String),

    /// Connect/auth failure against the source database or the FTP target.
    #[error("Connection error ({what}): {message}")]
    Connection { what: String, message: String },

    /// Source database query error after connecting.
    #[error("Source database error: {0}")]
    Sql(#[from] sqlx::Error),

    /// Upload or remote-directory failure that survived repair-and-retry.
    #[error("Transfer failed for {path}: {message}")]
    Transfer { path: String, message: String },

    /// The remote restore trigger returned something other than "1".
    /// Carries the response body verbatim as diagnostic detail.
    #[error("Database migration failed: {0}")]
    RemoteExecution(String),

    /// HTTP-layer failure while invoking the restore trigger.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// IO error (file operations).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl MigrateError {
    /// Create a Connection error with context about which endpoint failed.
    pub fn connection(what: impl Into<String>, message: impl Into<String>) -> Self {
        MigrateError::Connection {
            what: what.into(),
            message: message.into(),
        }
    }

    /// Create a Transfer error.
    pub fn transfer(path: impl Into<String>, message: impl Into<String>) -> Self {
        MigrateError::Transfer {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Format error with full details including error chain.
    pub fn format_detailed(&self) -> String {
        let mut output = format!("Error: {}\n", self);

        // Add error chain for wrapped errors
        let mut source = std::error::Error::source(self);
        let mut depth = 1;
        while let Some(err) = source {
            output.push_str(&format!("\nCaused by:\n  {}: {}", depth, err));
            source = err.source();
            depth += 1;
        }

        output
    }

    /// Process exit code for this error class.
    pub fn exit_code(&self) -> u8 {
        match self {
            MigrateError::Config(_) => 2,
            MigrateError::Connection { .. } | MigrateError::Sql(_) => 3,
            MigrateError::Transfer { .. } => 4,
            MigrateError::RemoteExecution(_) => 5,
            MigrateError::Http(_) | MigrateError::Io(_) => 1,
        }
    }
}

/// Result type alias for migration operations.
pub type Result<T> = std::result::Result<T, MigrateError>;

use thiserror::Error;

/// Errors produced by the store layer.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The referenced user, chat, message or invitation does not exist.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// A uniqueness rule was violated (duplicate username, duplicate
    /// pending invitation).
    #[error("{0}")]
    Conflict(String),

    /// The operation requires a logged-in user but no session is set.
    #[error("Not logged in")]
    Unauthenticated,

    /// Failed to determine a platform data directory.
    #[error("Could not determine application data directory")]
    NoDataDir,

    /// Generic I/O error (e.g. creating the storage directory).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A durable record could not be serialized or deserialized.
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// A durable record carries an unsupported schema version.
    #[error("Migration error: {0}")]
    Migration(String),
}

//! Error types for the Repertoire core library.

use thiserror::Error;

/// All errors that can occur within the Repertoire core library.
///
/// Expected, frequent outcomes of normal interaction (pressing "back" at the
/// root, a wrong drill move) are not errors; see
/// [`SessionFailure`](super::session::SessionFailure) and
/// [`DrillOutcome`](super::training::DrillOutcome).
#[derive(Debug, Error)]
pub enum RepertoireError {
    /// A SQLite operation in [`SqliteStore`](super::storage::SqliteStore) failed.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Stored data could not be (de)serialized as JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A constructor received malformed input (blank name, unknown side, bad square).
    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    /// A persisted payload carries a different `schemaVersion` than expected.
    #[error("Unsupported schemaVersion: found {found:?}, expected {expected}")]
    SchemaVersion { found: Option<i64>, expected: u32 },

    /// A persisted payload is not a well-formed app state object.
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    /// A FEN string has fewer than the four fields a position key needs.
    #[error("Invalid FEN: {0}")]
    InvalidFen(String),

    /// The opened file is not a valid Repertoire key-value store.
    #[error("Invalid store: {0}")]
    InvalidStore(String),

    /// An opening ID was requested that does not exist in the app state.
    #[error("Opening not found: {0}")]
    OpeningNotFound(String),

    /// An injected callback (move executor, display, storage) reported a failure.
    #[error("Callback failed: {0}")]
    Callback(String),
}

/// Convenience alias that pins the error type to [`RepertoireError`].
pub type Result<T> = std::result::Result<T, RepertoireError>;

impl RepertoireError {
    /// Returns a short, human-readable message suitable for display to the end user.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Database(e) => format!("Failed to save: {e}"),
            Self::Json(e) => format!("Data format error: {e}"),
            Self::ValidationFailed(msg) => msg.clone(),
            Self::SchemaVersion { .. } => {
                "Saved data was written by an incompatible version".to_string()
            }
            Self::InvalidPayload(_) => "Saved data is damaged and cannot be loaded".to_string(),
            Self::InvalidFen(_) => "Invalid position".to_string(),
            Self::InvalidStore(_) => "Could not open storage file".to_string(),
            Self::OpeningNotFound(_) => "Opening no longer exists".to_string(),
            Self::Callback(msg) => msg.clone(),
        }
    }
}

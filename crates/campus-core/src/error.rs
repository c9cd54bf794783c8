use campus_storage::StoreError;
use thiserror::Error;

/// Error taxonomy for core operations.
///
/// Expected membership outcomes (already a member, group full, not a member)
/// are **not** errors; they are returned as [`crate::JoinOutcome`] and
/// [`crate::LeaveOutcome`] variants so callers branch on them explicitly.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Malformed or missing required input.
    #[error("validation: {0}")]
    Validation(String),
    /// The referenced group (or user) does not exist.
    #[error("not found")]
    NotFound,
    /// The caller is not a member of the group.
    #[error("forbidden")]
    Forbidden,
    /// Backend failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl CoreError {
    pub(crate) fn validation(msg: &str) -> Self {
        CoreError::Validation(msg.to_string())
    }
}

/// Maps a `get_group` miss onto the core taxonomy.
pub(crate) fn not_found(e: StoreError) -> CoreError {
    match e {
        StoreError::NotFound => CoreError::NotFound,
        e => CoreError::Store(e),
    }
}

//! Core domain errors.

use thiserror::Error;

/// Core domain errors for Convo.
///
/// The analytics transform never fails; these cover the persistence seams.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Conversation not found.
    #[error("Conversation not found: {0}")]
    ConversationNotFound(String),

    /// Key-value storage failure (unavailable, unreadable, poisoned).
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, CoreError>;

//! Unified error system for Atrium core
//!
//! A single error type covers the whole workspace. Rejections that are part
//! of normal control flow (for example a sign-in from a disallowed domain)
//! are not errors; they are expressed as outcome values by the components
//! that produce them.

use serde::{Deserialize, Serialize};

/// Unified error type for all Atrium operations
#[derive(Debug, Clone, Serialize, Deserialize, thiserror::Error)]
pub enum AtriumError {
    /// Invalid input or configuration
    #[error("Invalid: {message}")]
    Invalid {
        /// Error message describing the invalid input
        message: String,
    },

    /// Resource not found
    #[error("Not found: {message}")]
    NotFound {
        /// Error message describing what was not found
        message: String,
    },

    /// Permission denied
    #[error("Permission denied: {message}")]
    PermissionDenied {
        /// Error message describing the permission issue
        message: String,
    },

    /// Optimistic-concurrency conflict; the caller should re-read and retry
    #[error("Conflict: {message}")]
    Conflict {
        /// Error message describing the conflicting write
        message: String,
    },

    /// Transient storage failure (connection loss, timeout)
    #[error("Storage error: {message}")]
    Storage {
        /// Error message describing the storage failure
        message: String,
    },

    /// Internal system error
    #[error("Internal error: {message}")]
    Internal {
        /// Error message describing the internal error
        message: String,
    },
}

impl AtriumError {
    /// Create an invalid input error
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid {
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create a permission denied error
    pub fn permission_denied(message: impl Into<String>) -> Self {
        Self::PermissionDenied {
            message: message.into(),
        }
    }

    /// Create a conflict error
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    /// Create a storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Whether retrying the whole operation may succeed.
    ///
    /// Storage failures and write conflicts are transient; everything else
    /// reflects bad input or a broken invariant and must surface to the
    /// caller.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Storage { .. } | Self::Conflict { .. })
    }
}

/// Result type alias used throughout the workspace
pub type Result<T> = std::result::Result<T, AtriumError>;

// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Error types for substrate operations.

use serde::{Deserialize, Serialize};

/// Error category for retry/routing decisions.
///
/// - **Transient**: auto-retry likely to succeed (network, timeout, lock contention).
/// - **Permanent**: don't auto-retry (validation, not found, state conflict).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Unknown category — use default retry policy.
    #[default]
    Unknown,
    /// Retry is likely to succeed.
    Transient,
    /// Don't retry.
    Permanent,
}

/// Result type using [`CoreError`].
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors raised by the durable execution substrate.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum CoreError {
    /// Instance was not found in the database.
    #[error("instance '{instance_id}' not found")]
    InstanceNotFound {
        /// The instance ID that was not found.
        instance_id: String,
    },

    /// Instance is in an invalid state for the requested operation.
    #[error("instance '{instance_id}' is in invalid state: expected '{expected}', got '{actual}'")]
    InvalidInstanceState {
        /// The instance ID.
        instance_id: String,
        /// The expected status.
        expected: String,
        /// The actual status.
        actual: String,
    },

    /// Checkpoint save failed.
    #[error("failed to save checkpoint '{checkpoint_id}' for instance '{instance_id}': {reason}")]
    CheckpointSaveFailed {
        /// The instance ID.
        instance_id: String,
        /// The checkpoint ID.
        checkpoint_id: String,
        /// The reason for failure.
        reason: String,
    },

    /// Awakeable was not found.
    #[error("awakeable '{awakeable_id}' not found")]
    AwakeableNotFound {
        /// The awakeable ID that was not found.
        awakeable_id: String,
    },

    /// Input validation failed.
    #[error("validation failed for '{field}': {message}")]
    ValidationError {
        /// The field that failed validation.
        field: String,
        /// The validation error message.
        message: String,
    },

    /// Database operation failed.
    #[error("database error during {operation}: {details}")]
    DatabaseError {
        /// The operation that failed.
        operation: String,
        /// Error details.
        details: String,
    },
}

impl CoreError {
    /// Stable error code, independent of the underlying transport.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InstanceNotFound { .. } => "INSTANCE_NOT_FOUND",
            Self::InvalidInstanceState { .. } => "INVALID_INSTANCE_STATE",
            Self::CheckpointSaveFailed { .. } => "CHECKPOINT_SAVE_FAILED",
            Self::AwakeableNotFound { .. } => "AWAKEABLE_NOT_FOUND",
            Self::ValidationError { .. } => "VALIDATION_ERROR",
            Self::DatabaseError { .. } => "DATABASE_ERROR",
        }
    }

    /// Category used to decide whether the caller should retry.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::DatabaseError { .. } => ErrorCategory::Transient,
            Self::InstanceNotFound { .. }
            | Self::InvalidInstanceState { .. }
            | Self::CheckpointSaveFailed { .. }
            | Self::AwakeableNotFound { .. }
            | Self::ValidationError { .. } => ErrorCategory::Permanent,
        }
    }
}

impl From<sqlx::Error> for CoreError {
    fn from(err: sqlx::Error) -> Self {
        CoreError::DatabaseError {
            operation: "query".to_string(),
            details: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        CoreError::DatabaseError {
            operation: "json".to_string(),
            details: err.to_string(),
        }
    }
}

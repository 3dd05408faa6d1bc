// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! SDK-specific error types.

use thiserror::Error;

/// Errors that can occur while driving a workflow through [`crate::WorkflowContext`].
#[derive(Debug, Error)]
pub enum SdkError {
    /// The underlying substrate (`order-core`) reported an error.
    #[error("substrate error: {0}")]
    Substrate(#[from] order_core::CoreError),

    /// A checkpointed step's persisted result failed to deserialize into the
    /// type the caller asked for on replay.
    #[error("checkpoint '{checkpoint_id}' could not be deserialized: {source}")]
    CheckpointDecode {
        /// The checkpoint id whose state failed to decode.
        checkpoint_id: String,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// A step's result failed to serialize for persistence.
    #[error("step result could not be serialized: {0}")]
    Serialization(#[from] serde_json::Error),

    /// `await_awakeable` timed out without a resolution; the caller should
    /// re-suspend the instance and wait to be redriven.
    #[error("awakeable '{0}' not yet resolved")]
    AwakeablePending(String),
}

/// Type alias for SDK results.
pub type Result<T> = std::result::Result<T, SdkError>;

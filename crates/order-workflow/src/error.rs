// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Workflow-level errors: a thin wrapper over the domain and SDK error
//! types, plus the few errors that originate at the workflow's own
//! boundary (request validation).

use thiserror::Error;

/// Errors raised while driving the order workflow.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// The caller's request was missing required fields or named an empty
    /// item list.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// A domain-level error (insufficient stock, not found, conflict, ...).
    #[error(transparent)]
    Domain(#[from] order_domain::OrderError),

    /// An error from the durable execution substrate or its SDK layer.
    #[error(transparent)]
    Sdk(#[from] order_sdk::SdkError),
}

/// Result type using [`WorkflowError`].
pub type Result<T> = std::result::Result<T, WorkflowError>;

// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Error types for order-domain.

use serde::{Deserialize, Serialize};

/// Error category for retry/routing decisions.
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

/// Result type using [`OrderError`].
pub type Result<T> = std::result::Result<T, OrderError>;

/// Errors raised by the order domain and its repository.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum OrderError {
    /// The request itself is malformed (missing field, non-positive quantity, ...).
    #[error("invalid request: {message}")]
    InvalidRequest {
        /// Human-readable detail.
        message: String,
    },

    /// Not enough stock to satisfy a reservation.
    #[error("insufficient stock for item '{item_id}' of merchant '{merchant_id}': requested {requested}, available {available}")]
    InsufficientStock {
        /// The merchant whose inventory was insufficient.
        merchant_id: String,
        /// The item that was short.
        item_id: String,
        /// Quantity requested.
        requested: i64,
        /// Quantity actually available.
        available: i64,
    },

    /// Referenced entity does not exist.
    #[error("{entity} '{id}' not found")]
    NotFound {
        /// The kind of entity (`"order"`, `"payment"`, `"shipment"`, ...).
        entity: String,
        /// The id that was not found.
        id: String,
    },

    /// An upstream payment/shipping provider could not be reached or timed out.
    #[error("provider unavailable: {message}")]
    ProviderUnavailable {
        /// Human-readable detail.
        message: String,
    },

    /// The payment provider declined the payment outright.
    #[error("payment declined: {reason}")]
    PaymentDeclined {
        /// Reason given by the provider.
        reason: String,
    },

    /// The requested transition conflicts with the entity's current state.
    #[error("conflict: {message}")]
    Conflict {
        /// Human-readable detail.
        message: String,
    },

    /// Unexpected internal failure (database, serialization, substrate).
    #[error("internal error: {message}")]
    Internal {
        /// Human-readable detail.
        message: String,
    },
}

impl OrderError {
    /// Stable error code used in API responses and logs.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidRequest { .. } => "INVALID_REQUEST",
            Self::InsufficientStock { .. } => "INSUFFICIENT_STOCK",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::ProviderUnavailable { .. } => "PROVIDER_UNAVAILABLE",
            Self::PaymentDeclined { .. } => "PAYMENT_DECLINED",
            Self::Conflict { .. } => "CONFLICT",
            Self::Internal { .. } => "INTERNAL",
        }
    }

    /// Category used to decide whether the caller should retry.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ProviderUnavailable { .. } => ErrorCategory::Transient,
            Self::InvalidRequest { .. }
            | Self::InsufficientStock { .. }
            | Self::NotFound { .. }
            | Self::PaymentDeclined { .. }
            | Self::Conflict { .. } => ErrorCategory::Permanent,
            Self::Internal { .. } => ErrorCategory::Unknown,
        }
    }
}

impl From<sqlx::Error> for OrderError {
    fn from(err: sqlx::Error) -> Self {
        OrderError::Internal {
            message: format!("database error: {err}"),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for OrderError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        OrderError::Internal {
            message: format!("migration error: {err}"),
        }
    }
}

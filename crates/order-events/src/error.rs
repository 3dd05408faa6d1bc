// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Error types for the event bus.

/// Result type using [`BusError`].
pub type Result<T> = std::result::Result<T, BusError>;

/// Errors raised by the Kafka-backed event bus.
#[derive(Debug, thiserror::Error)]
pub enum BusError {
    /// Failed to construct a producer or consumer.
    #[error("failed to connect to Kafka: {0}")]
    Connection(String),

    /// Failed to publish a message.
    #[error("failed to publish event: {0}")]
    Publish(String),

    /// Failed to subscribe to topics.
    #[error("failed to subscribe: {0}")]
    Subscribe(String),

    /// A received message could not be decoded as an [`crate::EventEnvelope`].
    #[error("failed to decode event envelope: {0}")]
    Decode(#[from] serde_json::Error),

    /// A handler passed to [`crate::EventConsumer::run`] failed to process a
    /// decoded event. Distinct from [`BusError::Decode`]: the envelope was
    /// fine, applying it wasn't. Returned to the bus so the offset is left
    /// uncommitted and the message is redelivered.
    #[error("event handler failed: {0}")]
    Handler(String),
}

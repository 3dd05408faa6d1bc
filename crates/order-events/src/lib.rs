// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Kafka-backed event bus carrying order domain events between components
//! that don't call each other directly — principally the payment webhook
//! intake, which publishes, and its consumer, which resumes suspended order
//! workflows.
//!
//! Two topics are used (see [`config::EventBusConfig`]): one for order
//! lifecycle events, one for payment outcomes. Both carry the same
//! [`EventEnvelope`] shape.

#![deny(missing_docs)]

/// Bus connection configuration.
pub mod config;

/// The subscribing side.
pub mod consumer;

/// Bus errors.
pub mod error;

/// The event envelope.
pub mod event;

/// The publishing side.
pub mod producer;

pub use config::EventBusConfig;
pub use consumer::EventConsumer;
pub use error::{BusError, Result};
pub use event::{EventEnvelope, EventType};
pub use producer::EventProducer;

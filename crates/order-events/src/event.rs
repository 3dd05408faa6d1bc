// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! The event envelope published to and consumed from the bus.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The kind of domain event carried by an [`EventEnvelope`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    /// An order was created and stock reserved.
    OrderCreated,
    /// The payment provider confirmed payment for an order.
    PaymentCompleted,
    /// A payment invoice expired before it was paid.
    PaymentExpired,
}

impl EventType {
    /// String form used in logs and as a routing hint.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OrderCreated => "order_created",
            Self::PaymentCompleted => "payment_completed",
            Self::PaymentExpired => "payment_expired",
        }
    }
}

/// A single event on the bus.
///
/// `data` is a JSON object rather than a typed payload per event kind: the
/// bus only ever needs to route and log by `event_type`/`aggregate_id`, and a
/// loosely-typed payload lets producers and consumers evolve independently.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEnvelope {
    /// The kind of event.
    pub event_type: EventType,
    /// Schema version of `data`, for consumers that need to branch on it.
    pub event_version: u32,
    /// The id of the aggregate the event concerns (an order id, in every
    /// event kind this crate currently carries).
    pub aggregate_id: String,
    /// Event-specific payload.
    pub data: serde_json::Value,
    /// When the event was produced.
    pub timestamp: DateTime<Utc>,
}

impl EventEnvelope {
    /// Build an envelope with `event_version` 1 and `timestamp` set to now.
    pub fn new(event_type: EventType, aggregate_id: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            event_type,
            event_version: 1,
            aggregate_id: aggregate_id.into(),
            data,
            timestamp: Utc::now(),
        }
    }
}

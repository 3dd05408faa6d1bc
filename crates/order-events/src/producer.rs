// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Publishing side of the event bus.

use std::time::Duration;

use rdkafka::producer::{FutureProducer, FutureRecord};
use tracing::debug;

use crate::config::EventBusConfig;
use crate::error::{BusError, Result};
use crate::event::EventEnvelope;

/// Publishes [`EventEnvelope`]s to Kafka topics, keyed by aggregate id so
/// all events for one order land on the same partition and are delivered
/// to a consumer group in order.
pub struct EventProducer {
    producer: FutureProducer,
}

impl EventProducer {
    /// Create a producer from bus configuration.
    pub fn new(config: &EventBusConfig) -> Result<Self> {
        let producer: FutureProducer = config
            .producer_client_config()
            .create()
            .map_err(|e| BusError::Connection(e.to_string()))?;
        Ok(Self { producer })
    }

    /// Publish an envelope to `topic`, keyed by `envelope.aggregate_id`.
    #[tracing::instrument(skip(self, envelope), fields(topic = topic, aggregate_id = %envelope.aggregate_id))]
    pub async fn publish(&self, topic: &str, envelope: &EventEnvelope) -> Result<()> {
        let payload = serde_json::to_vec(envelope)?;
        let key = envelope.aggregate_id.clone();
        let record = FutureRecord::to(topic).payload(&payload).key(&key);

        self.producer
            .send(record, Duration::from_secs(5))
            .await
            .map_err(|(e, _)| BusError::Publish(e.to_string()))?;

        debug!(event_type = envelope.event_type.as_str(), "published event");
        Ok(())
    }
}
